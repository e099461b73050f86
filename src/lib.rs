//! # u-dispatch
//!
//! Daily delivery routing from a single depot: Clarke-Wright savings
//! construction with hours-of-service and trailer-capacity evaluation.
//!
//! ## Modules
//!
//! - [`config`]: Regulatory and business parameters (`DispatchConfig`)
//! - [`models`]: Orders, aggregated stop volumes, route metrics, day/week plans
//! - [`distance`]: Labelled distance matrix with missing entries
//! - [`evaluation`]: Route evaluation: distance, drive/duty hours, load
//! - [`constructive`]: Clarke-Wright savings construction
//! - [`planner`]: Per-day solves assembled into a weekly plan
//! - [`io`]: CSV ingestion and schedule reporting
//! - [`generate`]: Seeded synthetic instances

pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod generate;
pub mod io;
pub mod models;
pub mod planner;

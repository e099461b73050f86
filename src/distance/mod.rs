//! Distance lookup between location codes.
//!
//! Provides a labelled distance matrix with explicit
//! missing entries.

mod matrix;

pub use matrix::DistanceMatrix;

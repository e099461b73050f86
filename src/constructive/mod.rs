//! Constructive heuristics for building daily routes.
//!
//! - [`clarke_wright_savings`]: Clarke-Wright savings algorithm (1964), O(n² log n)

mod clarke_wright;

pub use clarke_wright::{clarke_wright_savings, pair_saving, savings_list, Saving};

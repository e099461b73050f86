//! Route evaluation: distance, drive/duty hours, load, and feasibility flags.

mod evaluator;

pub use evaluator::RouteEvaluator;

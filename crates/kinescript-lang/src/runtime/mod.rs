pub mod evaluator;
pub mod host;
pub mod value;

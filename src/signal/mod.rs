pub mod evaluator;
pub mod message;

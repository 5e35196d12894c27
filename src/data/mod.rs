pub mod addition;

pub use addition::{max_operand, sample_batch, AdditionExample};

pub mod activation;

pub use activation::{squash, squash_derivative, squash_derivative_matrix, squash_matrix};

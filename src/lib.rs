pub mod activation;
pub mod data;
pub mod encoding;
pub mod error;
pub mod math;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::{squash, squash_derivative};
pub use data::addition::AdditionExample;
pub use encoding::bits::{decode, encode, BitSequence};
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use network::network::RecurrentNetwork;
pub use optim::ascent::GradientAscent;
pub use train::bptt::{train, TrainOutcome};
pub use train::train_config::TrainConfig;

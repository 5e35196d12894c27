pub mod bptt;
pub mod gradients;
pub mod loop_fn;
pub mod progress;
pub mod train_config;

pub use bptt::{compute_gradients, train, train_with, TrainOutcome};
pub use gradients::GradientAccumulators;
pub use loop_fn::{evaluate, run_addition, train_loop, Evaluation};
pub use progress::ProgressReport;
pub use train_config::TrainConfig;

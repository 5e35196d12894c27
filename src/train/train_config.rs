use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::train::progress::ProgressReport;

/// Configuration for a `train_loop` run on the addition task.
///
/// Every field has a default, so a JSON file only needs the keys it wants
/// to change.
///
/// # Fields
/// - `hidden_size`   — hidden units in the recurrent layer
/// - `iterations`    — number of single-example training calls
/// - `learning_rate` — step size for the additive update
/// - `bit_width`     — timesteps per example; operands use `bit_width - 1` bits
/// - `report_every`  — iterations between progress reports
/// - `seed`          — seeds both weight initialization and example sampling
/// - `init_lower` / `init_upper` — initial weight range `[lower, upper)`
/// - `progress_tx`   — optional channel sender; one `ProgressReport` is sent
///                     per report.  If the receiver is dropped the loop
///                     stops early.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub hidden_size: usize,
    pub iterations: usize,
    pub learning_rate: f64,
    pub bit_width: usize,
    pub report_every: usize,
    pub seed: u64,
    pub init_lower: f64,
    pub init_upper: f64,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<ProgressReport>>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            hidden_size: 16,
            iterations: 20_000,
            learning_rate: 0.1,
            bit_width: 8,
            report_every: 1_000,
            seed: 0,
            init_lower: -1.0,
            init_upper: 1.0,
            progress_tx: None,
        }
    }
}

impl TrainConfig {
    /// Reads a config from a JSON file; missing keys take their defaults.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hidden_size == 0 {
            return Err(NetworkError::Config("hidden_size must be positive".into()));
        }
        if self.iterations == 0 {
            return Err(NetworkError::Config("iterations must be positive".into()));
        }
        if self.report_every == 0 {
            return Err(NetworkError::Config("report_every must be positive".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NetworkError::Config(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if !(2..=64).contains(&self.bit_width) {
            return Err(NetworkError::Config(format!(
                "bit_width must be between 2 and 64, got {}",
                self.bit_width
            )));
        }
        let span = self.init_upper - self.init_lower;
        if !(self.init_lower < self.init_upper) || !span.is_finite() {
            return Err(NetworkError::InvalidRange {
                lower: self.init_lower,
                upper: self.init_upper,
            });
        }
        Ok(())
    }
}

use std::error::Error;
use std::sync::mpsc;
use std::thread;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use carry_rnn::data::addition::sample_batch;
use carry_rnn::train::{evaluate, run_addition, ProgressReport};
use carry_rnn::{decode, AdditionExample, TrainConfig};

/// Train a recurrent network to add binary numbers with truncated BPTT.
#[derive(Parser, Debug)]
#[command(name = "carry-rnn", version, about)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Hidden units in the recurrent layer
    #[arg(long)]
    hidden_size: Option<usize>,

    /// Number of training examples
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Learning rate
    #[arg(short, long)]
    learning_rate: Option<f64>,

    /// Bits per sequence
    #[arg(short, long)]
    bit_width: Option<usize>,

    /// Iterations between progress reports
    #[arg(long)]
    report_every: Option<usize>,

    /// Seed for initialization and sampling
    #[arg(short, long)]
    seed: Option<u64>,

    /// Held-out examples scored after training
    #[arg(long, default_value_t = 1000)]
    held_out: usize,

    /// Print every progress report to stdout as a JSON line
    #[arg(long)]
    json: bool,
}

impl Args {
    fn into_config(self) -> Result<(TrainConfig, usize, bool), Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => TrainConfig::load_json(path)?,
            None => TrainConfig::default(),
        };
        if let Some(v) = self.hidden_size {
            config.hidden_size = v;
        }
        if let Some(v) = self.iterations {
            config.iterations = v;
        }
        if let Some(v) = self.learning_rate {
            config.learning_rate = v;
        }
        if let Some(v) = self.bit_width {
            config.bit_width = v;
        }
        if let Some(v) = self.report_every {
            config.report_every = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        config.validate()?;
        Ok((config, self.held_out, self.json))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let (mut config, held_out, json) = Args::parse().into_config()?;

    let printer = if json {
        let (tx, rx) = mpsc::channel::<ProgressReport>();
        config.progress_tx = Some(tx);
        Some(thread::spawn(move || {
            for report in rx {
                match serde_json::to_string(&report) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("failed to encode report: {e}"),
                }
            }
        }))
    } else {
        None
    };

    info!(
        hidden_size = config.hidden_size,
        iterations = config.iterations,
        learning_rate = config.learning_rate,
        bit_width = config.bit_width,
        seed = config.seed,
        "training"
    );
    let (network, final_error) = run_addition(&config)?;

    // Close the channel so the printer drains and exits.
    config.progress_tx = None;
    if let Some(handle) = printer {
        handle.join().map_err(|_| "report printer panicked")?;
    }

    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let examples = sample_batch(&mut rng, config.bit_width, held_out)?;
    let eval = evaluate(&network, &examples)?;
    info!(
        final_error,
        accuracy = eval.accuracy,
        mean_error = eval.mean_error,
        held_out,
        "finished"
    );

    let probe = AdditionExample::new(3, 5, config.bit_width)?;
    let guess = network.predict(&probe.inputs, config.bit_width)?;
    info!(guess = %guess, "3 + 5 = {}", decode(&guess));

    Ok(())
}

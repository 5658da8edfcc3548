use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use machine_learning::{
    circuit::CircuitGenerator,
    dataset::{BimodalDataset, make_dataset},
    distance::wasserstein_1d,
    init::rng_from_seed,
    oracle::Generator,
};
use orchestrator::{TrainingConfig, train};
use qot::report::RunReport;

/// Trains a circuit generator against a 1D target with a Wasserstein critic.
#[derive(Parser)]
#[command(name = "qot", version, about)]
struct Cli {
    /// JSON training config, flags given on the command line override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    epochs: Option<usize>,
    #[arg(long)]
    batch_size: Option<usize>,
    /// Critic updates per batch.
    #[arg(long)]
    critic_steps: Option<usize>,
    #[arg(long, conflicts_with = "no_seed")]
    seed: Option<u64>,
    /// Draw every random stream from OS entropy.
    #[arg(long)]
    no_seed: bool,
    #[arg(long)]
    learning_rate: Option<f32>,
    /// Size of the fixed training set.
    #[arg(long)]
    train_size: Option<usize>,
    #[arg(long)]
    critic_layers: Option<usize>,
    #[arg(long)]
    generator_layers: Option<usize>,
    /// Size of the held-out set the final generator is compared against.
    #[arg(long, default_value_t = 128)]
    val_size: usize,
    /// Where to write the run's config, history and parameters as JSON.
    #[arg(long)]
    history_out: Option<PathBuf>,
}

impl Cli {
    fn training_config(&self) -> Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::from_path(path)?,
            None => TrainingConfig {
                epochs: 15,
                ..Default::default()
            },
        };

        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(critic_steps) = self.critic_steps {
            config.critic_steps = critic_steps;
        }
        if let Some(learning_rate) = self.learning_rate {
            config.learning_rate = learning_rate;
        }
        if let Some(train_size) = self.train_size {
            config.train_size = train_size;
        }
        if let Some(critic_layers) = self.critic_layers {
            config.critic_layers = critic_layers;
        }
        if let Some(generator_layers) = self.generator_layers {
            config.generator_layers = generator_layers;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_seed {
            config.seed = None;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.training_config()?;
    info!("config: {config:?}");

    let trained = train(config.clone())?;

    let (_, val) = make_dataset(
        &BimodalDataset::default(),
        config.train_size,
        cli.val_size,
        config.seed,
    );
    let mut rng = rng_from_seed(config.seed.map(|s| s.wrapping_add(42)));
    let fake = CircuitGenerator.sample(trained.generator_params.view(), val.len(), &mut rng)?;

    let validation_w1 = wasserstein_1d(&val, &fake);
    if validation_w1.is_nan() {
        warn!("held-out distance is undefined, the held-out set is empty");
    }

    let report = RunReport::new(&config, &trained, validation_w1);
    println!("Training complete.");
    print!("{}", report.render());

    if let Some(path) = &cli.history_out {
        report.write_json(path)?;
        info!("run written to {}", path.display());
    }

    Ok(())
}

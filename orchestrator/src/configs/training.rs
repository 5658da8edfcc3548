use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;

/// Everything the orchestrator needs to drive a training run.
///
/// Missing fields take their default values when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// The amount of epochs, the run always completes all of them.
    pub epochs: usize,
    /// The size of each real batch, the last batch of an epoch may be smaller.
    pub batch_size: usize,
    /// The amount of critic updates per batch.
    pub critic_steps: usize,
    pub critic_layers: usize,
    pub generator_layers: usize,
    /// The magnitude of every sign step.
    pub learning_rate: f32,
    /// The size of the fixed training sample set.
    pub train_size: usize,
    /// The run seed, `None` draws every random stream from OS entropy.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 20,
            batch_size: 32,
            critic_steps: 2,
            critic_layers: 1,
            generator_layers: 1,
            learning_rate: 0.05,
            train_size: 256,
            seed: Some(0),
        }
    }
}

impl TrainingConfig {
    /// Parses a config from a JSON document.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the document isn't a valid config.
    pub fn from_json(s: &str) -> Result<Self, OrchestratorError> {
        serde_json::from_str(s)
            .map_err(|e| OrchestratorError::InvalidConfig(format!("invalid JSON: {e}")))
    }

    /// Loads a config from a JSON file.
    ///
    /// # Errors
    /// Returns `Io` if the file can't be read and `InvalidConfig` if it can't be parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, OrchestratorError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Checks that the config describes a run that can start.
    ///
    /// # Errors
    /// Returns `InvalidConfig` describing the first offending field.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        let counts = [
            ("epochs", self.epochs),
            ("batch_size", self.batch_size),
            ("critic_steps", self.critic_steps),
            ("critic_layers", self.critic_layers),
            ("generator_layers", self.generator_layers),
            ("train_size", self.train_size),
        ];

        if let Some((name, _)) = counts.iter().find(|(_, value)| *value == 0) {
            return Err(OrchestratorError::InvalidConfig(format!(
                "{name} must be greater than 0"
            )));
        }

        if !self.learning_rate.is_finite() || self.learning_rate <= 0. {
            return Err(OrchestratorError::InvalidConfig(format!(
                "learning_rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }

        Ok(())
    }

    /// The seed of the critic's initial parameters.
    pub(crate) fn critic_seed(&self) -> Option<u64> {
        self.seed
    }

    /// The seed of the generator's initial parameters.
    pub(crate) fn generator_seed(&self) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(1))
    }

    /// The seed of the stream driving epoch `epoch`, distinct per epoch.
    pub(crate) fn epoch_seed(&self, epoch: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(epoch as u64))
    }
}

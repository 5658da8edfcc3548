pub mod configs;
pub mod error;
pub mod history;
mod trainer;

use machine_learning::{
    circuit::{CircuitCritic, CircuitGenerator},
    dataset::BimodalDataset,
};

pub use configs::TrainingConfig;
pub use error::OrchestratorError;
pub use history::{EpochMetrics, Metric, MetricsHistory};
pub use trainer::{Orchestrator, TrainedModel};

/// Trains the circuit critic and generator against the bimodal target distribution.
///
/// # Errors
/// Returns an `OrchestratorError` if the config is invalid or the run fails midway.
pub fn train(config: TrainingConfig) -> Result<TrainedModel, OrchestratorError> {
    log::info!("building orchestrator");
    let mut orchestrator = Orchestrator::new(
        config,
        CircuitCritic::new(),
        CircuitGenerator::new(),
        BimodalDataset::default(),
    )?;
    orchestrator.run()
}

use serde::Serialize;

/// One of the values tracked once per epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Sorted-sample W1 between the training set and a full generated set.
    ClassicalW1,
    /// The critic's learned Wasserstein estimate.
    QuantumEstimate,
    /// The last generator loss of the epoch.
    GenLoss,
    /// The last critic loss of the epoch.
    CriticLoss,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::ClassicalW1,
        Metric::QuantumEstimate,
        Metric::GenLoss,
        Metric::CriticLoss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::ClassicalW1 => "classical_w1",
            Metric::QuantumEstimate => "quantum_estimate",
            Metric::GenLoss => "gen_loss",
            Metric::CriticLoss => "critic_loss",
        }
    }
}

/// The values recorded at the end of a single epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMetrics {
    pub classical_w1: f32,
    pub quantum_estimate: f32,
    pub gen_loss: f32,
    pub critic_loss: f32,
}

/// Append-only record of every metric, one value per completed epoch.
///
/// All four sequences always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsHistory {
    classical_w1: Vec<f32>,
    quantum_estimate: Vec<f32>,
    gen_loss: Vec<f32>,
    critic_loss: Vec<f32>,
}

impl MetricsHistory {
    /// Returns an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, metrics: EpochMetrics) {
        self.classical_w1.push(metrics.classical_w1);
        self.quantum_estimate.push(metrics.quantum_estimate);
        self.gen_loss.push(metrics.gen_loss);
        self.critic_loss.push(metrics.critic_loss);
    }

    /// The amount of completed epochs.
    pub fn len(&self) -> usize {
        self.classical_w1.len()
    }

    /// Whether no epoch has completed yet.
    pub fn is_empty(&self) -> bool {
        self.classical_w1.is_empty()
    }

    /// The sequence of a single metric, ordered by epoch.
    pub fn get(&self, metric: Metric) -> &[f32] {
        match metric {
            Metric::ClassicalW1 => &self.classical_w1,
            Metric::QuantumEstimate => &self.quantum_estimate,
            Metric::GenLoss => &self.gen_loss,
            Metric::CriticLoss => &self.critic_loss,
        }
    }

    /// The metrics recorded at `epoch`.
    pub fn epoch(&self, epoch: usize) -> Option<EpochMetrics> {
        Some(EpochMetrics {
            classical_w1: *self.classical_w1.get(epoch)?,
            quantum_estimate: *self.quantum_estimate.get(epoch)?,
            gen_loss: *self.gen_loss.get(epoch)?,
            critic_loss: *self.critic_loss.get(epoch)?,
        })
    }

    /// The metrics of the most recent epoch.
    pub fn last(&self) -> Option<EpochMetrics> {
        self.len().checked_sub(1).and_then(|i| self.epoch(i))
    }

    /// Iterates the epochs in order.
    pub fn iter(&self) -> impl Iterator<Item = EpochMetrics> + '_ {
        (0..self.len()).filter_map(|i| self.epoch(i))
    }
}

use std::{fs, path::Path};

use machine_learning::Params;
use orchestrator::{Metric, MetricsHistory, TrainedModel, TrainingConfig};
use serde::Serialize;

/// Window of the smoothed classical distance column.
const SMOOTHING_WINDOW: usize = 3;

/// Simple moving average over `window` consecutive values.
///
/// Inputs shorter than the window are returned unchanged.
pub fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    if window == 0 || values.len() < window {
        return values.to_vec();
    }

    values
        .windows(window)
        .map(|w| w.iter().sum::<f32>() / window as f32)
        .collect()
}

/// A finished run, as written by `--history-out`.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub config: &'a TrainingConfig,
    pub history: &'a MetricsHistory,
    pub critic_params: Vec<Vec<f32>>,
    pub generator_params: Vec<Vec<f32>>,
    pub validation_w1: f32,
}

impl<'a> RunReport<'a> {
    pub fn new(config: &'a TrainingConfig, trained: &'a TrainedModel, validation_w1: f32) -> Self {
        Self {
            config,
            history: &trained.history,
            critic_params: rows(&trained.critic_params),
            generator_params: rows(&trained.generator_params),
            validation_w1,
        }
    }

    /// Writes the report as pretty JSON.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Renders the per-epoch table followed by the final values.
    pub fn render(&self) -> String {
        let history = self.history;
        let smoothed = moving_average(history.get(Metric::ClassicalW1), SMOOTHING_WINDOW);
        // the average of a full window lands on its last epoch
        let offset = history.len() - smoothed.len();

        let mut out = format!(
            "{:>5}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}\n",
            "epoch", "classical_w1", "smoothed", "estimate", "gen_loss", "critic_loss"
        );

        for (i, m) in history.iter().enumerate() {
            let smooth = i
                .checked_sub(offset)
                .and_then(|j| smoothed.get(j))
                .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));

            out.push_str(&format!(
                "{:>5}  {:>12.4}  {:>12}  {:>12.4}  {:>12.4}  {:>12.4}\n",
                i + 1,
                m.classical_w1,
                smooth,
                m.quantum_estimate,
                m.gen_loss,
                m.critic_loss
            ));
        }

        if let Some(last) = history.last() {
            out.push_str(&format!("\nFinal classical W1: {}\n", last.classical_w1));
            out.push_str(&format!("Final quantum estimate: {}\n", last.quantum_estimate));
        }
        out.push_str(&format!("Held-out classical W1: {}\n", self.validation_w1));

        out
    }
}

fn rows(params: &Params) -> Vec<Vec<f32>> {
    params.rows().into_iter().map(|r| r.to_vec()).collect()
}

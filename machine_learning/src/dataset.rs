use rand::Rng;
use rand_distr::StandardNormal;

use crate::{MlErr, Result, init::rng_from_seed};

/// A source of i.i.d. samples from a fixed target distribution.
pub trait DatasetProvider {
    /// Draws `n` samples.
    ///
    /// # Arguments
    /// * `n` - The amount of samples to draw.
    /// * `seed` - Makes the draw deterministic when present.
    fn sample(&self, n: usize, seed: Option<u64>) -> Vec<f32>;
}

/// A mixture of two equally likely normal peaks, clipped to `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BimodalDataset {
    left: f32,
    right: f32,
    std_dev: f32,
}

impl BimodalDataset {
    /// Creates a new `BimodalDataset`.
    ///
    /// # Arguments
    /// * `left` - The mean of the first peak.
    /// * `right` - The mean of the second peak.
    /// * `std_dev` - The standard deviation shared by both peaks.
    ///
    /// # Returns
    /// An error if any value isn't finite or `std_dev` is negative.
    pub fn new(left: f32, right: f32, std_dev: f32) -> Result<Self> {
        if !(left.is_finite() && right.is_finite()) {
            return Err(MlErr::InvalidDistribution(format!(
                "peak means must be finite, got {left} and {right}"
            )));
        }

        if !std_dev.is_finite() || std_dev < 0. {
            return Err(MlErr::InvalidDistribution(format!(
                "standard deviation must be finite and non negative, got {std_dev}"
            )));
        }

        Ok(Self {
            left,
            right,
            std_dev,
        })
    }
}

impl Default for BimodalDataset {
    fn default() -> Self {
        Self {
            left: -0.5,
            right: 0.5,
            std_dev: 0.1,
        }
    }
}

impl DatasetProvider for BimodalDataset {
    fn sample(&self, n: usize, seed: Option<u64>) -> Vec<f32> {
        let mut rng = rng_from_seed(seed);

        (0..n)
            .map(|_| {
                let mean = if rng.random_bool(0.5) {
                    self.right
                } else {
                    self.left
                };
                let z: f32 = rng.sample(StandardNormal);
                (mean + self.std_dev * z).clamp(-1., 1.)
            })
            .collect()
    }
}

/// Draws a training and a validation split from `provider`.
///
/// The validation split uses the next seed so both splits differ.
///
/// # Returns
/// A tuple with the training and validation samples.
pub fn make_dataset<D: DatasetProvider>(
    provider: &D,
    n_train: usize,
    n_val: usize,
    seed: Option<u64>,
) -> (Vec<f32>, Vec<f32>) {
    let train = provider.sample(n_train, seed);
    let val = provider.sample(n_val, seed.map(|s| s.wrapping_add(1)));
    (train, val)
}

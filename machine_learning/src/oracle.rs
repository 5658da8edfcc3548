use ndarray::ArrayView2;
use rand::Rng;

use crate::{MlErr, Result};

/// Scores samples given a set of parameters.
///
/// Implementations must be pure: the same parameters and inputs always give the same scores,
/// one score per input.
pub trait Critic {
    /// The amount of parameters each layer of this critic consumes.
    fn layer_width(&self) -> usize;

    /// Scores every sample in `xs`.
    ///
    /// # Arguments
    /// * `params` - The critic's parameters.
    /// * `xs` - The samples to score.
    ///
    /// # Returns
    /// One score per sample or an error if `params` has the wrong shape.
    fn score(&self, params: ArrayView2<f32>, xs: &[f32]) -> Result<Vec<f32>>;
}

/// Produces samples in `[-1, 1]` driven by freshly drawn latent noise.
pub trait Generator {
    /// The amount of parameters each layer of this generator consumes.
    fn layer_width(&self) -> usize;

    /// Draws `n` samples, consuming exactly `n` latent values from `rng`.
    ///
    /// # Arguments
    /// * `params` - The generator's parameters.
    /// * `n` - The amount of samples to produce.
    /// * `rng` - The source of latent noise.
    ///
    /// # Returns
    /// `n` samples or an error if `params` has the wrong shape.
    fn sample<R: Rng>(
        &self,
        params: ArrayView2<f32>,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<f32>>;
}

/// Checks that `params` has `expected` columns.
pub(crate) fn check_width(what: &'static str, params: ArrayView2<f32>, expected: usize) -> Result<()> {
    let got = params.ncols();
    if got != expected {
        return Err(MlErr::ShapeMismatch {
            what,
            got,
            expected,
        });
    }

    Ok(())
}

/// Checks that an oracle returned one value per requested item.
pub(crate) fn check_len(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(MlErr::SizeMismatch {
            a: what,
            b: "requested batch",
            got,
            expected,
        });
    }

    Ok(())
}

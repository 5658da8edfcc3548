use std::f32::consts::PI;

use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::Uniform;

use crate::{Params, Result};

/// Builds a random number generator, seeded when a seed is given and from OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Draws a fresh `(layers, width)` parameter array with every angle uniform in `[-π, π)`.
///
/// # Arguments
/// * `layers` - The amount of circuit layers.
/// * `width` - The amount of parameters per layer.
/// * `seed` - Makes the draw deterministic when present.
///
/// # Returns
/// The parameters or an error if the distribution couldn't be built.
pub fn init_params(layers: usize, width: usize, seed: Option<u64>) -> Result<Params> {
    let mut rng = rng_from_seed(seed);
    let distribution = Uniform::new(-PI, PI)?;
    Ok(Array2::random_using((layers, width), distribution, &mut rng))
}

use std::f32::consts::PI;

use ndarray::ArrayView2;
use rand::Rng;

use super::state::{StateVector, rx, ry, rz};
use crate::{
    Result,
    oracle::{Generator, check_width},
};

const WIDTH: usize = 3;

/// A single qubit generator.
///
/// A latent value `z ~ U[0, 1)` is loaded as `RY(πz)`, every layer applies RX, RY, RZ and the
/// probability `p1` of reading `|1>` is mapped to the sample `2 * p1 - 1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CircuitGenerator;

impl CircuitGenerator {
    /// Returns a new `CircuitGenerator`.
    pub fn new() -> Self {
        Self
    }

    fn sample_one(&self, params: ArrayView2<f32>, z: f32) -> f32 {
        let mut state = StateVector::zero(1);
        state.apply(&ry(PI * z), 0);

        for layer in params.rows() {
            state.apply(&rx(layer[0]), 0);
            state.apply(&ry(layer[1]), 0);
            state.apply(&rz(layer[2]), 0);
        }

        (2. * state.prob_one(0) - 1.).clamp(-1., 1.)
    }
}

impl Generator for CircuitGenerator {
    fn layer_width(&self) -> usize {
        WIDTH
    }

    fn sample<R: Rng>(&self, params: ArrayView2<f32>, n: usize, rng: &mut R) -> Result<Vec<f32>> {
        check_width("generator", params, WIDTH)?;

        let samples = (0..n)
            .map(|_| {
                let z: f32 = rng.random();
                self.sample_one(params, z)
            })
            .collect();

        Ok(samples)
    }
}

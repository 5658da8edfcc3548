use ndarray::ArrayView2;

use super::{
    embedding::encode_sample,
    state::{StateVector, rx, ry, rz},
};
use crate::{
    Result,
    oracle::{Critic, check_width},
};

const QUBITS: usize = 2;
const WIDTH: usize = 6;

/// A two qubit re-uploading critic.
///
/// Each sample is encoded on both qubits, then every layer applies RX, RY, RZ to each qubit
/// followed by a CZ. The score is the Pauli-Z expectation of qubit 0, so it lies in `[-1, 1]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CircuitCritic;

impl CircuitCritic {
    /// Returns a new `CircuitCritic`.
    pub fn new() -> Self {
        Self
    }

    fn score_one(&self, params: ArrayView2<f32>, x: f32) -> f32 {
        let mut state = StateVector::zero(QUBITS);
        encode_sample(&mut state, x, 0);
        encode_sample(&mut state, x, 1);

        for layer in params.rows() {
            state.apply(&rx(layer[0]), 0);
            state.apply(&ry(layer[1]), 0);
            state.apply(&rz(layer[2]), 0);
            state.apply(&rx(layer[3]), 1);
            state.apply(&ry(layer[4]), 1);
            state.apply(&rz(layer[5]), 1);
            state.cz(0, 1);
        }

        state.expval_z(0)
    }
}

impl Critic for CircuitCritic {
    fn layer_width(&self) -> usize {
        WIDTH
    }

    fn score(&self, params: ArrayView2<f32>, xs: &[f32]) -> Result<Vec<f32>> {
        check_width("critic", params, WIDTH)?;
        Ok(xs.iter().map(|&x| self.score_one(params, x)).collect())
    }
}

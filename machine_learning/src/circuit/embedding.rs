use std::f32::consts::PI;

use super::state::{StateVector, ry};

/// Maps a sample in `[-1, 1]` to a rotation angle in `[0, π]`.
#[inline]
pub fn angle_for_sample(x: f32) -> f32 {
    PI * (x + 1.) / 2.
}

/// Encodes a sample into `qubit` through a Y rotation.
pub fn encode_sample(state: &mut StateVector, x: f32, qubit: usize) {
    state.apply(&ry(angle_for_sample(x)), qubit);
}

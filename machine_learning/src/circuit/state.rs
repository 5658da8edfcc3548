//! A minimal state-vector simulator, just enough for the shallow critic and generator circuits.
//!
//! Qubit 0 is the most significant bit of a basis state's index.

use ndarray::Array1;
use num_complex::Complex32;

/// A single-qubit unitary in row-major order.
pub type Gate = [[Complex32; 2]; 2];

/// Rotation about the X axis.
pub fn rx(theta: f32) -> Gate {
    let (s, c) = (theta / 2.).sin_cos();
    [
        [Complex32::new(c, 0.), Complex32::new(0., -s)],
        [Complex32::new(0., -s), Complex32::new(c, 0.)],
    ]
}

/// Rotation about the Y axis.
pub fn ry(theta: f32) -> Gate {
    let (s, c) = (theta / 2.).sin_cos();
    [
        [Complex32::new(c, 0.), Complex32::new(-s, 0.)],
        [Complex32::new(s, 0.), Complex32::new(c, 0.)],
    ]
}

/// Rotation about the Z axis.
pub fn rz(theta: f32) -> Gate {
    let half = theta / 2.;
    [
        [Complex32::from_polar(1., -half), Complex32::new(0., 0.)],
        [Complex32::new(0., 0.), Complex32::from_polar(1., half)],
    ]
}

/// The amplitudes of an `n` qubit register.
#[derive(Debug, Clone)]
pub struct StateVector {
    n_qubits: usize,
    amps: Array1<Complex32>,
}

impl StateVector {
    /// Creates a register of `n_qubits` qubits in the `|0...0>` state.
    pub fn zero(n_qubits: usize) -> Self {
        let mut amps = Array1::zeros(1 << n_qubits);
        amps[0] = Complex32::new(1., 0.);
        Self { n_qubits, amps }
    }

    #[inline]
    fn mask(&self, qubit: usize) -> usize {
        1 << (self.n_qubits - 1 - qubit)
    }

    /// Applies a single-qubit gate to `qubit`.
    pub fn apply(&mut self, gate: &Gate, qubit: usize) {
        let mask = self.mask(qubit);

        for i in 0..self.amps.len() {
            if i & mask != 0 {
                continue;
            }

            let j = i | mask;
            let (a0, a1) = (self.amps[i], self.amps[j]);
            self.amps[i] = gate[0][0] * a0 + gate[0][1] * a1;
            self.amps[j] = gate[1][0] * a0 + gate[1][1] * a1;
        }
    }

    /// Applies a controlled-Z between qubits `a` and `b`.
    pub fn cz(&mut self, a: usize, b: usize) {
        let both = self.mask(a) | self.mask(b);

        for (i, amp) in self.amps.iter_mut().enumerate() {
            if i & both == both {
                *amp = -*amp;
            }
        }
    }

    /// Probability of measuring `qubit` in `|1>`.
    pub fn prob_one(&self, qubit: usize) -> f32 {
        let mask = self.mask(qubit);
        self.amps
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum()
    }

    /// Expectation value of Pauli-Z on `qubit`.
    pub fn expval_z(&self, qubit: usize) -> f32 {
        1. - 2. * self.prob_one(qubit)
    }

    /// The squared norm of the state, 1 up to rounding.
    pub fn norm_sqr(&self) -> f32 {
        self.amps.iter().map(|a| a.norm_sqr()).sum()
    }
}

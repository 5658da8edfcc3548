mod critic;
mod embedding;
mod generator;
pub mod state;

pub use critic::CircuitCritic;
pub use embedding::{angle_for_sample, encode_sample};
pub use generator::CircuitGenerator;

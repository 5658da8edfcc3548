pub mod circuit;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod init;
pub mod loss;
pub mod optimization;
pub mod oracle;

pub use error::{MlErr, Result};

/// A role's parameters, shaped `(layers, per_layer_width)`.
pub type Params = ndarray::Array2<f32>;

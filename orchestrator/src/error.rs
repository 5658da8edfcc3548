use std::fmt;

use machine_learning::MlErr;

/// All errors that can occur in the orchestrator.
#[derive(Debug)]
pub enum OrchestratorError {
    /// Invalid configuration, caught before any oracle call.
    InvalidConfig(String),
    /// The initial parameters couldn't be drawn.
    Init(MlErr),
    /// An oracle returned malformed output during an epoch.
    Oracle { epoch: usize, source: MlErr },
    /// A loss or metric stopped being finite, the run can't recover from it.
    NonFinite {
        epoch: usize,
        batch: Option<usize>,
        what: &'static str,
        value: f32,
    },
    /// An underlying I/O error.
    Io(std::io::Error),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Init(e) => write!(f, "failed to initialize parameters: {e}"),
            Self::Oracle { epoch, source } => write!(f, "oracle failure at epoch {epoch}: {source}"),
            Self::NonFinite {
                epoch,
                batch: Some(batch),
                what,
                value,
            } => write!(f, "{what} became {value} at epoch {epoch}, batch {batch}"),
            Self::NonFinite {
                epoch,
                batch: None,
                what,
                value,
            } => write!(f, "{what} became {value} at epoch {epoch}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Init(e) => Some(e),
            Self::Oracle { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for OrchestratorError {
    fn from(e: MlErr) -> Self {
        Self::Init(e)
    }
}

impl From<std::io::Error> for OrchestratorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

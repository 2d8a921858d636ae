use std::path::PathBuf;
use thiserror::Error;

use crate::exit_code;
use crate::{Diagnostic, Expected, Observed};

pub type Result<T> = core::result::Result<T, ProbeError>;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to load library `{path}`: {diagnostic}")]
    LibraryNotLoadable {
        path: PathBuf,
        diagnostic: Diagnostic,
    },
    #[error("Failed to resolve symbol `{symbol}`: {diagnostic}")]
    SymbolNotFound {
        index: usize,
        symbol: String,
        diagnostic: Diagnostic,
    },
    #[error("Bad result from `{symbol}`: {observed} (expected {expected})")]
    UnexpectedResult {
        index: usize,
        symbol: String,
        observed: Observed,
        expected: Expected,
    },
    #[error("Failed to write the probe output")]
    Output(#[from] std::io::Error),
}

impl ProbeError {
    /// The process exit code that identifies the failing stage.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProbeError::LibraryNotLoadable { .. } => exit_code::LIBRARY_NOT_LOADABLE,
            ProbeError::SymbolNotFound { index, .. } => exit_code::symbol_not_found(*index),
            ProbeError::UnexpectedResult { index, .. } => exit_code::unexpected_result(*index),
            ProbeError::Output(_) => exit_code::OUTPUT,
        }
    }
}

impl<T> From<ProbeError> for std::result::Result<T, ProbeError> {
    fn from(error: ProbeError) -> Self {
        Err(error)
    }
}

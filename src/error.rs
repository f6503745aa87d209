//! Error taxonomy shared across loaders, kernels and plotting.
//!
//! Nothing here is recoverable: every variant aborts the current invocation
//! and surfaces through the binary's exit status.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Unrecognized enum-like option or out-of-range numeric parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An expected result file is absent.
    #[error("missing data: {0}")]
    MissingData(String),

    /// Input exists but violates a structural requirement.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("rendering plot: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for Error
{
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Render(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error type shared by every stage of the pipeline.

use polars::error::PolarsError;
use thiserror::Error;

/// Errors raised while loading, grouping, aggregating or rendering.
#[derive(Error, Debug)]
pub enum CytoError {
    /// Input table is missing an expected column or cannot be interpreted.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// More replicate groups were formed than labels were supplied.
    #[error(
        "label mismatch: {labels} labels supplied but {context} needs {groups}"
    )]
    LabelMismatch {
        groups:  usize,
        labels:  usize,
        context: String,
    },

    /// Two series that are paired positionally differ in length.
    #[error("series length mismatch: {left} vs {right}")]
    SeriesMismatch { left: usize, right: usize },

    /// The renderer was handed no bars or panels.
    #[error("nothing to render: {0}")]
    NothingToRender(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to draw chart: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CytoError>;

impl CytoError {
    pub(crate) fn data_format(msg: impl Into<String>) -> Self {
        CytoError::DataFormat(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        CytoError::Config(msg.into())
    }

    pub(crate) fn plot<E: std::fmt::Display>(err: E) -> Self {
        CytoError::Plot(err.to_string())
    }
}

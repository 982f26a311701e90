//! Input handling: cytometry export tables and experiment configuration.

mod config;
mod table;

pub use config::{
    AnalysisConfig,
    ExperimentConfig,
    LoaderConfig,
    WashSeriesConfig,
};
pub use table::{
    TableReaderBuilder,
    DEFAULT_SENTINELS,
};

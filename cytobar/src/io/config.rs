use std::path::{
    Path,
    PathBuf,
};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use super::table::{
    TableReaderBuilder,
    DEFAULT_SENTINELS,
};
use crate::data_structs::{
    ConditionMeta,
    HexColor,
};
use crate::error::{
    CytoError,
    Result,
};
use crate::plots::PlotStyle;
use crate::tools::grouping::{
    DEFAULT_PREFIX_LEN,
    DEFAULT_REPLICATES,
};

fn default_output_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_replicates() -> usize {
    DEFAULT_REPLICATES
}

fn default_prefix_len() -> usize {
    DEFAULT_PREFIX_LEN
}

fn default_metric_label() -> String {
    "Geometric Mean".to_string()
}

/// One experiment: which table to read, how to group it and where to draw.
///
/// ```toml
/// experiment = "28-10-25"
/// input = "data/28-Oct-2025 FlowJo table.csv"
/// columns = ["cells/Single Cells | Geometric Mean (FL1-H :: 355nm405-30-H)"]
/// labels = ["ICR58 + ICR190", "ICR66 + ICR190"]
/// seed = 7
///
/// [analysis]
/// kind = "conditions"
///
/// [analysis.conditions."02"]
/// condition = "Light"
/// color = "#d86ecc"
///
/// [analysis.conditions."01"]
/// condition = "Dark"
/// color = "#bfbfbf"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Identifier used as the first part of every output file name.
    pub experiment:   String,
    pub input:        PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir:   PathBuf,
    /// Y axis metric, e.g. "Geometric Mean".
    #[serde(default = "default_metric_label")]
    pub metric_label: String,
    /// Filter/channel token for file names. Derived from the column name
    /// when absent.
    #[serde(default)]
    pub filter:       Option<String>,
    pub columns:      Vec<String>,
    #[serde(default)]
    pub labels:       Vec<String>,
    #[serde(default = "default_replicates")]
    pub replicates:   usize,
    #[serde(default)]
    pub seed:         Option<u64>,
    #[serde(default)]
    pub loader:       LoaderConfig,
    #[serde(default)]
    pub style:        PlotStyle,
    pub analysis:     AnalysisConfig,
}

/// Loader settings, mirrored onto [`TableReaderBuilder`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    pub sentinels:    Vec<String>,
    pub skip_tail:    usize,
    pub strip_suffix: Option<String>,
    pub id_column:    Option<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sentinels:    DEFAULT_SENTINELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skip_tail:    0,
            strip_suffix: None,
            id_column:    None,
        }
    }
}

impl LoaderConfig {
    pub fn builder(&self) -> TableReaderBuilder {
        TableReaderBuilder::default()
            .with_sentinels(self.sentinels.clone())
            .with_skip_tail(self.skip_tail)
            .with_strip_suffix(self.strip_suffix.clone())
            .with_id_column(self.id_column.clone())
    }
}

/// Grouping strategy and the chart it feeds.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisConfig {
    /// Whole table block-grouped into replicate groups, one bar each.
    Bars {
        #[serde(default)]
        color: HexColor,
    },
    /// Rows partitioned by well prefix, one bar cluster per condition.
    Conditions {
        #[serde(default = "default_prefix_len")]
        prefix_len: usize,
        conditions: IndexMap<String, ConditionMeta>,
    },
    /// Plate-row pairs differenced per wash step.
    Wash { series: Vec<WashSeriesConfig> },
    /// Channel-vs-channel regression per condition block.
    Regression {
        x_column:   String,
        block_size: usize,
        conditions: Vec<String>,
        #[serde(default)]
        color:      HexColor,
    },
}

impl AnalysisConfig {
    /// Middle part of the output file names.
    pub fn kind_token(&self) -> &'static str {
        match self {
            AnalysisConfig::Bars { .. } => "bars",
            AnalysisConfig::Conditions { .. } => "light-dark",
            AnalysisConfig::Wash { .. } => "wash-results",
            AnalysisConfig::Regression { .. } => "regression",
        }
    }
}

/// One construct in a wash experiment: baseline and treated plate rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WashSeriesConfig {
    pub name:         String,
    pub color:        HexColor,
    pub baseline_row: char,
    pub treated_row:  char,
}

impl ExperimentConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading experiment config {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: ExperimentConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.replicates == 0 {
            return Err(CytoError::config("replicates must be positive"));
        }
        if self.columns.is_empty() {
            return Err(CytoError::config("no measurement columns listed"));
        }
        self.style.validate()?;
        match &self.analysis {
            AnalysisConfig::Bars { .. } => {
                if self.labels.is_empty() {
                    return Err(CytoError::config("bars analysis needs labels"));
                }
            },
            AnalysisConfig::Conditions {
                prefix_len,
                conditions,
            } => {
                if *prefix_len == 0 {
                    return Err(CytoError::config("prefix_len must be positive"));
                }
                if conditions.is_empty() {
                    return Err(CytoError::config("no conditions listed"));
                }
                if self.labels.is_empty() {
                    return Err(CytoError::config(
                        "conditions analysis needs labels",
                    ));
                }
            },
            AnalysisConfig::Wash { series } => {
                if series.is_empty() {
                    return Err(CytoError::config("no wash series listed"));
                }
            },
            AnalysisConfig::Regression {
                block_size,
                conditions,
                ..
            } => {
                if *block_size == 0 {
                    return Err(CytoError::config("block_size must be positive"));
                }
                if conditions.is_empty() {
                    return Err(CytoError::config("no conditions listed"));
                }
            },
        }
        Ok(())
    }
}

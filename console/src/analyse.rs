use std::path::PathBuf;

use clap::Args;
use cytobar::prelude::*;
use cytobar::tools::grouping::{
    DEFAULT_PREFIX_LEN,
    DEFAULT_REPLICATES,
};
use indexmap::IndexMap;
use log::info;

use crate::strings::{
    analysis as strings,
    input as input_strings,
};
use crate::utils::{
    parse_condition,
    parse_wash_series,
    print_report,
    validate_input,
    UtilsArgs,
};

/// Table and naming options shared by every analysis command.
#[derive(Args, Debug, Clone)]
pub(crate) struct InputArgs {
    #[arg(required = true, help = input_strings::INPUT)]
    input:        PathBuf,
    #[arg(short, long = "column", num_args = 1.., required = true, help = input_strings::COLUMNS)]
    columns:      Vec<String>,
    #[arg(short, long, num_args = 1.., help = input_strings::LABELS)]
    labels:       Vec<String>,
    #[arg(short, long, default_value = "experiment", help = input_strings::EXPERIMENT)]
    experiment:   String,
    #[arg(short, long, default_value_t = DEFAULT_REPLICATES, help = input_strings::REPLICATES)]
    replicates:   usize,
    #[arg(short, long, default_value = "Geometric Mean", help = input_strings::METRIC)]
    metric:       String,
    #[arg(short, long, help = input_strings::FILTER)]
    filter:       Option<String>,
    #[arg(long, default_value_t = 0, help_heading = "LOADER ARGS", help = input_strings::SKIP_TAIL)]
    skip_tail:    usize,
    #[arg(long, help_heading = "LOADER ARGS", help = input_strings::STRIP_SUFFIX)]
    strip_suffix: Option<String>,
    #[arg(long, help_heading = "LOADER ARGS", help = input_strings::ID_COLUMN)]
    id_column:    Option<String>,
}

impl InputArgs {
    fn config(
        &self,
        utils: &UtilsArgs,
        analysis: AnalysisConfig,
    ) -> ExperimentConfig {
        ExperimentConfig {
            experiment: self.experiment.clone(),
            input: self.input.clone(),
            output_dir: utils.output_dir(),
            metric_label: self.metric.clone(),
            filter: self.filter.clone(),
            columns: self.columns.clone(),
            labels: self.labels.clone(),
            replicates: self.replicates,
            seed: utils.seed,
            loader: LoaderConfig {
                skip_tail: self.skip_tail,
                strip_suffix: self.strip_suffix.clone(),
                id_column: self.id_column.clone(),
                ..Default::default()
            },
            style: PlotStyle::default(),
            analysis,
        }
    }

    /// Validates the input, runs the experiment and prints what was written.
    fn execute(
        &self,
        utils: &UtilsArgs,
        analysis: AnalysisConfig,
    ) -> anyhow::Result<()> {
        validate_input(&self.input)?;
        let experiment = utils.apply(Experiment::new(self.config(utils, analysis))?);
        info!("Running {}", self.experiment);
        let report = experiment.run()?;
        print_report(&self.experiment, &report);
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct BarsArgs {
    #[clap(flatten)]
    input: InputArgs,
    #[arg(long, default_value = "#d86ecc", help = strings::COLOR)]
    color: HexColor,
}

impl BarsArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        self.input
            .execute(utils, AnalysisConfig::Bars { color: self.color })
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ConditionsArgs {
    #[clap(flatten)]
    input:      InputArgs,
    #[arg(
        short = 'C',
        long = "condition",
        num_args = 1..,
        required = true,
        value_parser = parse_condition,
        help = strings::CONDITION
    )]
    conditions: Vec<(String, ConditionMeta)>,
    #[arg(long, default_value_t = DEFAULT_PREFIX_LEN, help = strings::PREFIX_LEN)]
    prefix_len: usize,
}

impl ConditionsArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let conditions: IndexMap<String, ConditionMeta> =
            self.conditions.iter().cloned().collect();
        self.input.execute(utils, AnalysisConfig::Conditions {
            prefix_len: self.prefix_len,
            conditions,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct WashArgs {
    #[clap(flatten)]
    input:  InputArgs,
    #[arg(
        short = 'S',
        long = "series",
        num_args = 1..,
        required = true,
        value_parser = parse_wash_series,
        help = strings::SERIES
    )]
    series: Vec<WashSeriesConfig>,
}

impl WashArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        self.input.execute(utils, AnalysisConfig::Wash {
            series: self.series.clone(),
        })
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct RegressionArgs {
    #[clap(flatten)]
    input:      InputArgs,
    #[arg(short = 'x', long, required = true, help = strings::X_COLUMN)]
    x_column:   String,
    #[arg(short, long, required = true, help = strings::BLOCK_SIZE)]
    block_size: usize,
    #[arg(
        short = 'C',
        long = "conditions",
        num_args = 1..,
        required = true,
        help = strings::BLOCK_CONDITIONS
    )]
    conditions: Vec<String>,
    #[arg(long, default_value = "#d86ecc", help = strings::COLOR)]
    color:      HexColor,
}

impl RegressionArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        self.input.execute(utils, AnalysisConfig::Regression {
            x_column:   self.x_column.clone(),
            block_size: self.block_size,
            conditions: self.conditions.clone(),
            color:      self.color,
        })
    }
}

//! Runs one configured experiment end to end: load, group, aggregate,
//! render.

use std::path::{
    Path,
    PathBuf,
};

use chrono::NaiveDate;
use log::{
    debug,
    info,
    warn,
};
use serde::Serialize;

use super::aggregate::{
    paired_difference,
    summarize,
};
use super::grouping::{
    BlockGrouper,
    PrefixPartitioner,
    WashGrouper,
};
use crate::data_structs::{
    Difference,
    GroupSummary,
    SampleTable,
};
use crate::error::{
    CytoError,
    Result,
};
use crate::io::{
    AnalysisConfig,
    ExperimentConfig,
};
use crate::plots::{
    BarChart,
    BarSeries,
    Figure,
    ImageFormat,
    OutputTarget,
    PlotStyle,
    RegressionGrid,
    RegressionPanel,
    PANEL_GRID_HEIGHT_IN,
};
use crate::utils::channel_token;
use crate::getter_fn;

/// Files written and conditions skipped by [`Experiment::run`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<String>,
}

/// Flat per-group record used for tabular summaries.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub column: String,
    pub series: String,
    pub index:  usize,
    pub label:  String,
    pub n:      usize,
    pub mean:   f64,
    pub std:    f64,
}

impl SummaryRow {
    fn from_summary(
        column: &str,
        series: &str,
        summary: &GroupSummary,
    ) -> Self {
        Self {
            column: column.to_string(),
            series: series.to_string(),
            index:  summary.index,
            label:  summary.label.clone(),
            n:      summary.n,
            mean:   summary.mean,
            std:    summary.std,
        }
    }

    fn from_difference(
        column: &str,
        series: &str,
        diff: &Difference,
    ) -> Self {
        Self {
            column: column.to_string(),
            series: series.to_string(),
            index:  diff.index,
            label:  diff.label.clone(),
            n:      diff.replicate_diffs.len(),
            mean:   diff.mean_diff,
            std:    diff.std_combined,
        }
    }
}

/// Chart built for one measurement column.
#[derive(Debug, Clone)]
pub enum Chart {
    Bars(BarChart),
    Regression(RegressionGrid),
}

impl Chart {
    pub fn render(
        &self,
        target: &OutputTarget,
        style: &PlotStyle,
        seed: Option<u64>,
        formats: &[ImageFormat],
    ) -> Result<Vec<PathBuf>> {
        match self {
            Chart::Bars(chart) => chart.render_formats(target, style, seed, formats),
            Chart::Regression(grid) => {
                grid.render_formats(target, style, seed, formats)
            },
        }
    }
}

/// Everything computed for one measurement column, before rendering.
#[derive(Debug, Clone)]
pub struct ColumnAnalysis {
    pub column:  String,
    pub chart:   Chart,
    pub rows:    Vec<SummaryRow>,
    /// Conditions or series without any rows.
    pub skipped: Vec<String>,
}

/// A validated [`ExperimentConfig`] plus run-time overrides.
#[derive(Debug, Clone)]
pub struct Experiment {
    config:  ExperimentConfig,
    date:    Option<NaiveDate>,
    formats: Vec<ImageFormat>,
}

impl Experiment {
    getter_fn!(config, ExperimentConfig);

    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            date: None,
            formats: ImageFormat::ALL.to_vec(),
        })
    }

    /// Reads a TOML config. A relative `input` is resolved against the
    /// config file's directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = ExperimentConfig::from_path(path)?;
        if config.input.is_relative() {
            if let Some(parent) = path.parent() {
                config.input = parent.join(&config.input);
            }
        }
        Self::new(config)
    }

    /// Overrides the date directory of the written files.
    pub fn with_date(
        mut self,
        date: NaiveDate,
    ) -> Self {
        self.date = Some(date);
        self
    }

    /// Restricts the written image formats. An empty list keeps the current
    /// ones.
    pub fn with_formats(
        mut self,
        formats: Vec<ImageFormat>,
    ) -> Self {
        if !formats.is_empty() {
            self.formats = formats;
        }
        self
    }

    pub fn with_seed(
        mut self,
        seed: Option<u64>,
    ) -> Self {
        if seed.is_some() {
            self.config.seed = seed;
        }
        self
    }

    pub fn with_output_dir(
        mut self,
        dir: impl Into<PathBuf>,
    ) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn load_table(&self) -> Result<SampleTable> {
        self.config.loader.builder().read_path(&self.config.input)
    }

    /// Groups and aggregates every configured column without drawing.
    pub fn analyse(
        &self,
        table: &SampleTable,
    ) -> Result<Vec<ColumnAnalysis>> {
        self.config
            .columns
            .iter()
            .map(|column| self.analyse_column(table, column))
            .collect()
    }

    /// Loads the table, then renders one chart per column.
    ///
    /// Columns with nothing to draw are logged and listed as skipped.
    pub fn run(&self) -> Result<RunReport> {
        let table = self.load_table()?;
        info!(
            "{}: {} rows from {}",
            self.config.experiment,
            table.len(),
            self.config.input.display()
        );
        let style = self.style();
        let mut report = RunReport::default();

        for analysis in self.analyse(&table)? {
            report.skipped.extend(analysis.skipped);
            let target = self.target(&analysis.column);
            match analysis.chart.render(
                &target,
                &style,
                self.config.seed,
                &self.formats,
            ) {
                Ok(paths) => report.written.extend(paths),
                Err(CytoError::NothingToRender(reason)) => {
                    warn!("{}: nothing drawn, {reason}", analysis.column);
                    report.skipped.push(analysis.column);
                },
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }

    /// Multi-panel figures default to a taller canvas.
    pub fn style(&self) -> PlotStyle {
        let style = self.config.style.clone();
        match self.config.analysis {
            AnalysisConfig::Regression { .. } => {
                style.with_default_height_in(PANEL_GRID_HEIGHT_IN)
            },
            _ => style,
        }
    }

    /// Filter token for file names. A configured filter only applies when a
    /// single column is drawn.
    fn token(
        &self,
        column: &str,
    ) -> String {
        match (&self.config.filter, self.config.columns.len()) {
            (Some(filter), 1) => filter.clone(),
            _ => channel_token(column),
        }
    }

    pub fn target(
        &self,
        column: &str,
    ) -> OutputTarget {
        let target = OutputTarget::from_parts(&self.config.output_dir, &[
            self.config.experiment.as_str(),
            self.config.analysis.kind_token(),
            self.config.metric_label.as_str(),
            self.token(column).as_str(),
        ]);
        match self.date {
            Some(date) => target.with_date(date),
            None => target,
        }
    }

    fn y_label(&self) -> String {
        format!("{} Fluorescence Intensity (a.u.)", self.config.metric_label)
    }

    fn analyse_column(
        &self,
        table: &SampleTable,
        column: &str,
    ) -> Result<ColumnAnalysis> {
        debug!("Analysing column '{column}'");
        let config = &self.config;
        let mut rows = Vec::new();
        let mut skipped = Vec::new();

        let chart = match &config.analysis {
            AnalysisConfig::Bars { color } => {
                let grouper = BlockGrouper::new(config.replicates)?;
                let groups = grouper.group(table, &config.labels, "table")?;
                let summaries = summarize(&groups, column, None)?;
                rows.extend(
                    summaries
                        .iter()
                        .map(|s| SummaryRow::from_summary(column, "", s)),
                );
                Chart::Bars(
                    BarChart::new("Construct", self.y_label())
                        .with_series(BarSeries::from_summaries("", *color, &summaries)),
                )
            },
            AnalysisConfig::Conditions {
                prefix_len,
                conditions,
            } => {
                let grouper = BlockGrouper::new(config.replicates)?;
                let partitions =
                    PrefixPartitioner::new(*prefix_len, conditions.clone())?
                        .partition(table)?;
                let mut chart = BarChart::new("Construct", self.y_label());
                for partition in partitions {
                    let name = partition.meta.condition.as_str();
                    if partition.table.is_empty() {
                        warn!(
                            "No rows with prefix '{}' ({name}), skipping",
                            partition.prefix
                        );
                        skipped.push(name.to_string());
                        continue;
                    }
                    let groups = partition.group(&grouper, &config.labels)?;
                    let summaries =
                        summarize(&groups, column, Some(&partition.meta))?;
                    rows.extend(
                        summaries
                            .iter()
                            .map(|s| SummaryRow::from_summary(column, name, s)),
                    );
                    chart.push_series(BarSeries::from_summaries(
                        name,
                        partition.meta.color,
                        &summaries,
                    ));
                }
                Chart::Bars(chart)
            },
            AnalysisConfig::Wash { series } => {
                let grouper = WashGrouper::new(config.replicates)?;
                let mut chart =
                    BarChart::new("Washes", format!("Δ {}", self.y_label()));
                for wash in series {
                    let baseline = summarize(
                        &grouper.group(table, wash.baseline_row)?,
                        column,
                        None,
                    )?;
                    let treated = summarize(
                        &grouper.group(table, wash.treated_row)?,
                        column,
                        None,
                    )?;
                    if baseline.is_empty() || treated.is_empty() {
                        let missing = match (baseline.is_empty(), treated.is_empty()) {
                            (true, true) => format!(
                                "rows {} and {}",
                                wash.baseline_row, wash.treated_row
                            ),
                            (true, false) => format!("row {}", wash.baseline_row),
                            _ => format!("row {}", wash.treated_row),
                        };
                        warn!("No wells in {missing} ({}), skipping", wash.name);
                        skipped.push(wash.name.clone());
                        continue;
                    }
                    let mut diffs = paired_difference(&baseline, &treated)?;
                    self.relabel_washes(&mut diffs, &wash.name)?;
                    rows.extend(
                        diffs
                            .iter()
                            .map(|d| SummaryRow::from_difference(column, &wash.name, d)),
                    );
                    chart.push_series(BarSeries::from_differences(
                        wash.name.as_str(),
                        wash.color,
                        &diffs,
                    ));
                }
                Chart::Bars(chart)
            },
            AnalysisConfig::Regression {
                x_column,
                block_size,
                conditions,
                color,
            } => {
                let groups = BlockGrouper::new(*block_size)?.group(
                    table,
                    conditions,
                    "regression",
                )?;
                let mut grid = RegressionGrid::new(
                    format!("{} fluorescence (a.u.)", channel_token(x_column)),
                    format!("{} fluorescence (a.u.)", channel_token(column)),
                    *color,
                );
                let summaries = summarize(&groups, column, None)?;
                rows.extend(
                    summaries
                        .iter()
                        .map(|s| SummaryRow::from_summary(column, "", s)),
                );
                for group in &groups {
                    grid.push_panel(RegressionPanel::fitted(
                        group.label().replace('-', ", "),
                        group.values(x_column)?,
                        group.values(column)?,
                    )?);
                }
                Chart::Regression(grid)
            },
        };

        Ok(ColumnAnalysis {
            column: column.to_string(),
            chart,
            rows,
            skipped,
        })
    }

    /// Wash differences are labelled by wash index unless labels are given.
    fn relabel_washes(
        &self,
        diffs: &mut [Difference],
        series: &str,
    ) -> Result<()> {
        let labels = &self.config.labels;
        if labels.is_empty() {
            return Ok(());
        }
        for diff in diffs.iter_mut() {
            diff.label = labels
                .get(diff.index)
                .ok_or_else(|| CytoError::LabelMismatch {
                    groups:  diff.index + 1,
                    labels:  labels.len(),
                    context: format!("wash series {series}"),
                })?
                .clone();
        }
        Ok(())
    }
}

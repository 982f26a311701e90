use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    anyhow,
    bail,
};
use chrono::NaiveDate;
use clap::Args;
use console::style;
use cytobar::prelude::*;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::LevelFilter;

use crate::strings::utils as strings;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(short, long, action = clap::ArgAction::Count, help = strings::VERBOSE)]
    pub verbose:  u8,
    #[arg(long, default_value_t = false, help = strings::PROGRESS)]
    pub progress: bool,
    #[arg(long, help = strings::SEED)]
    pub seed:     Option<u64>,
    #[arg(short, long, help = strings::OUT)]
    pub out:      Option<PathBuf>,
    #[arg(long, help = strings::DATE)]
    pub date:     Option<NaiveDate>,
    #[arg(long = "format", value_enum, num_args = 1.., help = strings::FORMAT)]
    pub formats:  Vec<ImageFormat>,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        let mut builder = pretty_env_logger::formatted_builder();
        builder.filter_level(level);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder.try_init()?;
        Ok(())
    }

    /// Applies the command-line overrides to a configured experiment.
    pub fn apply(
        &self,
        mut experiment: Experiment,
    ) -> Experiment {
        experiment = experiment
            .with_seed(self.seed)
            .with_formats(self.formats.clone());
        if let Some(out) = &self.out {
            experiment = experiment.with_output_dir(out);
        }
        if let Some(date) = self.date {
            experiment = experiment.with_date(date);
        }
        experiment
    }

    pub fn output_dir(&self) -> PathBuf {
        self.out.clone().unwrap_or_else(|| PathBuf::from("plots"))
    }
}

pub fn init_pbar(total: usize) -> anyhow::Result<ProgressBar> {
    let progress_bar = ProgressBar::new(total as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] \
                 {pos:>3.green}/{len:3} {msg}",
            )?
            .progress_chars("#>-"),
    );
    progress_bar.set_message("Processing...");
    Ok(progress_bar)
}

pub fn validate_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("Path {} does not exist.", style(path.display()).red());
    }
    if !path.is_file() {
        bail!("Path {} is not a file.", style(path.display()).red());
    }
    Ok(())
}

/// Reports the outcome of one experiment on the terminal.
pub fn print_report(
    experiment: &str,
    report: &RunReport,
) {
    for path in report.written.iter() {
        println!("[{}] {}", style("V").green(), path.display());
    }
    for skipped in report.skipped.iter() {
        eprintln!(
            "[{}] {experiment}: skipped {}",
            style("!").yellow(),
            style(skipped).yellow()
        );
    }
}

/// Parses `PREFIX=NAME:#rrggbb`.
pub fn parse_condition(value: &str) -> anyhow::Result<(String, ConditionMeta)> {
    let (prefix, rest) = value
        .split_once('=')
        .ok_or_else(|| anyhow!("expected PREFIX=NAME:#rrggbb, got '{value}'"))?;
    let (name, color) = rest
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("expected NAME:#rrggbb after '=', got '{rest}'"))?;
    if prefix.is_empty() || name.is_empty() {
        bail!("empty prefix or condition name in '{value}'");
    }
    Ok((prefix.to_string(), ConditionMeta::new(name, color.parse()?)))
}

/// Parses `NAME:BASELINE_ROW:TREATED_ROW:#rrggbb`.
pub fn parse_wash_series(value: &str) -> anyhow::Result<WashSeriesConfig> {
    let parts: Vec<&str> = value.split(':').collect();
    let [name, baseline, treated, color] = parts.as_slice()
    else {
        bail!("expected NAME:BASELINE_ROW:TREATED_ROW:#rrggbb, got '{value}'");
    };
    let row = |s: &str| -> anyhow::Result<char> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(anyhow!("plate row must be a single letter, got '{s}'")),
        }
    };
    Ok(WashSeriesConfig {
        name:         name.to_string(),
        color:        color.parse()?,
        baseline_row: row(baseline)?,
        treated_row:  row(treated)?,
    })
}

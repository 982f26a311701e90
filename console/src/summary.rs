use std::fs::File;
use std::io::{
    stdout,
    Write,
};
use std::path::PathBuf;

use clap::{
    Args,
    ValueEnum,
};
use cytobar::prelude::*;
use itertools::Itertools;

use crate::strings::summary as strings;
use crate::utils::{
    validate_input,
    UtilsArgs,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SummaryFormat {
    Tsv,
    Json,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SummaryArgs {
    #[arg(required = true, help = strings::CONFIG)]
    config: PathBuf,
    #[arg(long = "as", value_enum, default_value_t = SummaryFormat::Tsv, help = strings::FORMAT)]
    as_format: SummaryFormat,
    #[arg(long = "to", help = strings::OUTPUT)]
    output: Option<PathBuf>,
}

impl SummaryArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        validate_input(&self.config)?;
        let experiment = utils.apply(Experiment::from_path(&self.config)?);
        let table = experiment.load_table()?;
        let rows = experiment
            .analyse(&table)?
            .into_iter()
            .flat_map(|analysis| analysis.rows)
            .collect_vec();

        let sink: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(stdout().lock()),
        };
        write_summary(&rows, self.as_format, sink)
    }
}

fn write_summary<W: Write>(
    rows: &[SummaryRow],
    format: SummaryFormat,
    mut sink: W,
) -> anyhow::Result<()> {
    match format {
        SummaryFormat::Tsv => {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(b'\t')
                .from_writer(sink);
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        },
        SummaryFormat::Json => {
            serde_json::to_writer_pretty(&mut sink, rows)?;
            writeln!(sink)?;
        },
    }
    Ok(())
}

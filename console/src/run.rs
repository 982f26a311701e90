use std::path::PathBuf;

use clap::Args;
use console::style;
use cytobar::prelude::*;
use indicatif::ProgressBar;
use log::info;

use crate::strings::run as strings;
use crate::utils::{
    init_pbar,
    print_report,
    validate_input,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct RunArgs {
    #[arg(value_parser, num_args = 1.., required = true, help = strings::CONFIGS)]
    configs: Vec<PathBuf>,
}

impl RunArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        for path in self.configs.iter() {
            validate_input(path)?;
        }
        let experiments = self
            .configs
            .iter()
            .map(|path| Experiment::from_path(path).map(|e| utils.apply(e)))
            .collect::<Result<Vec<_>>>()?;

        let progress_bar = if utils.progress {
            init_pbar(experiments.len())?
        }
        else {
            ProgressBar::hidden()
        };

        let mut written = 0;
        for experiment in experiments.iter() {
            let name = experiment.config().experiment.as_str();
            info!("Running {name}");
            progress_bar.set_message(name.to_string());
            let report = experiment.run()?;
            written += report.written.len();
            progress_bar.suspend(|| print_report(name, &report));
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        println!(
            "{}",
            style(format!(
                "Wrote {written} images for {} experiments.",
                experiments.len()
            ))
            .green()
            .bold()
        );
        Ok(())
    }
}

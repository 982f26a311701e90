mod analyse;
mod run;
mod strings;
mod summary;
mod utils;

use analyse::{
    BarsArgs,
    ConditionsArgs,
    RegressionArgs,
    WashArgs,
};
use clap::{
    Parser,
    Subcommand,
};
use run::RunArgs;
use summary::SummaryArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Run experiments described by TOML config files.
    Run {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  RunArgs,
    },
    /// Block-group the whole table and draw one bar per group.
    Bars {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  BarsArgs,
    },
    /// Split wells by identifier prefix and draw one bar cluster per group.
    Conditions {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ConditionsArgs,
    },
    /// Draw treated-minus-baseline differences per wash step.
    Wash {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  WashArgs,
    },
    /// Fit one channel against another per condition block.
    Regression {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  RegressionArgs,
    },
    /// Print per-group statistics of a config without drawing.
    Summary {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  SummaryArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Run { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Bars { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Conditions { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Wash { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Regression { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Summary { utils, args } => {
            utils.setup()?;
            args.run(&utils)?
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_conditions_command() {
        let cli = Cli::try_parse_from([
            "cytobar",
            "conditions",
            "table.csv",
            "-c",
            "GeoMean",
            "-l",
            "G1",
            "G2",
            "-C",
            "02=Light:#d86ecc",
            "01=Dark:#bfbfbf",
            "--seed",
            "7",
            "--date",
            "2025-10-28",
        ])
        .unwrap();
        let MainMenu::Conditions { utils, .. } = cli.command
        else {
            panic!("expected the conditions command");
        };
        assert_eq!(utils.seed, Some(7));
        assert_eq!(utils.date.unwrap().to_string(), "2025-10-28");
    }
}

macro_rules! define_strings {
    (
        $($name:ident = $value:literal);*$(;)?
    ) => {
        $(
            pub const $name: &str = $value;
        )*
    };
}

pub mod utils {
    define_strings! {
        VERBOSE =
            "Increase log verbosity (-v info, -vv debug, -vvv trace). \
            RUST_LOG overrides it.";
        PROGRESS =
            "Display a progress bar when several experiments are run.";
        SEED =
            "Seed for the point jitter. Identical seeds give identical \
            images. Overrides the seed of a config file.";
        OUT =
            "Root directory of the written images. Files are placed under \
            <OUT>/<format>/<date>/.";
        DATE =
            "Date directory of the written images (YYYY-MM-DD). Defaults to \
            today.";
        FORMAT =
            "Image formats to write. Both SVG and PNG by default.";
    }
}

pub mod input {
    define_strings! {
        INPUT =
            "Path to the CSV table exported from the cytometry software.";
        COLUMNS =
            "Measurement columns to plot. One chart is written per column.";
        LABELS =
            "Group labels in table order. Group i gets label i.";
        EXPERIMENT =
            "Experiment identifier, used as the first part of file names.";
        REPLICATES =
            "Number of consecutive wells forming one replicate group.";
        METRIC =
            "Name of the plotted statistic, shown on the Y axis and in file \
            names.";
        FILTER =
            "Channel token for file names. Taken from the column name when \
            not set.";
        SKIP_TAIL =
            "Number of trailing rows to drop before sentinel filtering.";
        STRIP_SUFFIX =
            "Suffix removed from every well identifier, e.g. '.fcs'.";
        ID_COLUMN =
            "Name of the well identifier column. The first column is used \
            when not set.";
    }
}

pub mod analysis {
    define_strings! {
        COLOR =
            "Bar color as #rrggbb.";
        CONDITION =
            "Condition as PREFIX=NAME:#rrggbb, e.g. 02=Light:#d86ecc. Rows \
            whose well identifier starts with PREFIX belong to NAME. Repeat \
            for every condition, in legend order.";
        PREFIX_LEN =
            "Number of leading characters of the well identifier matched \
            against condition prefixes.";
        SERIES =
            "Wash series as NAME:BASELINE_ROW:TREATED_ROW:#rrggbb, e.g. \
            ICR58:A:B:#d86ecc. Repeat for every construct.";
        X_COLUMN =
            "Column plotted on the X axis of every regression panel.";
        BLOCK_SIZE =
            "Number of consecutive rows forming one condition block.";
        BLOCK_CONDITIONS =
            "Condition names of the row blocks, in table order.";
    }
}

pub mod run {
    define_strings! {
        CONFIGS =
            "Experiment config files (TOML). Relative input paths are \
            resolved against the config file.";
    }
}

pub mod summary {
    define_strings! {
        CONFIG =
            "Experiment config file (TOML).";
        FORMAT =
            "Summary format: tab-separated table or JSON.";
        OUTPUT =
            "Write the summary to this file instead of stdout.";
    }
}

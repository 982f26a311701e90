use std::path::Path;

use assert_approx_eq::assert_approx_eq;
use chrono::NaiveDate;
use cytobar::prelude::*;
use cytobar::tools::experiment::Chart;
use rstest::*;

mod common;
use common::{
    labels,
    DemoTableBuilder,
    FL1,
    FL2,
};

fn summary(
    index: usize,
    mean: f64,
    std: f64,
) -> GroupSummary {
    GroupSummary {
        index,
        label: format!("G{}", index + 1),
        n: 3,
        mean,
        std,
        values: vec![mean - std, mean, mean + std],
        condition: None,
    }
}

fn write_config(
    dir: &Path,
    body: &str,
) -> anyhow::Result<std::path::PathBuf> {
    let path = dir.join("experiment.toml");
    std::fs::write(&path, body)?;
    Ok(path)
}

#[test]
fn test_block_grouping_scenario() -> anyhow::Result<()> {
    let table = SampleTable::from_columns(
        ["A1", "A2", "A3", "A4", "A5", "A6"],
        vec![("value", vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0])],
    )?;
    let groups =
        BlockGrouper::default().group(&table, &labels(&["G1", "G2"]), "test")?;
    let summaries = summarize(&groups, "value", None)?;

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].label, "G1");
    assert_approx_eq!(summaries[0].mean, 2.0);
    assert_approx_eq!(summaries[0].std, 1.0);
    assert_eq!(summaries[1].label, "G2");
    assert_approx_eq!(summaries[1].mean, 11.0);
    assert_approx_eq!(summaries[1].std, 1.0);
    Ok(())
}

#[rstest]
#[case::sorted(vec![1.0, 2.0, 3.0])]
#[case::reversed(vec![3.0, 2.0, 1.0])]
#[case::shuffled(vec![2.0, 3.0, 1.0])]
fn test_aggregation_order_insensitive(#[case] values: Vec<f64>) {
    let (mean, std) = describe(&values);
    assert_approx_eq!(mean, 2.0);
    assert_approx_eq!(std, 1.0);
}

#[test]
fn test_single_value_group_has_nan_std() -> anyhow::Result<()> {
    let table =
        SampleTable::from_columns(["A1", "A2", "A3", "A4"], vec![(
            "value",
            vec![1.0, 2.0, 3.0, 7.0],
        )])?;
    let groups =
        BlockGrouper::default().group(&table, &labels(&["G1", "G2"]), "test")?;
    let summaries = summarize(&groups, "value", None)?;
    assert!(groups.iter().all(|g| !g.is_empty()));
    assert_eq!(summaries[1].n, 1);
    assert_approx_eq!(summaries[1].mean, 7.0);
    assert!(summaries[1].std.is_nan());
    Ok(())
}

#[test]
fn test_blank_cell_left_out_of_group_stats() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = DemoTableBuilder::new(&[FL1])
        .rows(&["A1", "A2", "A3"], &[1.0, f64::NAN, 3.0])
        .write(dir.path(), "table.csv")?;
    let table = TableReaderBuilder::default().read_path(&path)?;
    let groups =
        BlockGrouper::default().group(&table, &labels(&["G1"]), "test")?;
    let summaries = summarize(&groups, FL1, None)?;

    assert_eq!(summaries[0].n, 2);
    assert_approx_eq!(summaries[0].mean, 2.0);
    assert_approx_eq!(summaries[0].std, 2f64.sqrt());
    assert_eq!(summaries[0].values.len(), 3);
    assert!(summaries[0].values[1].is_nan());
    Ok(())
}

#[test]
fn test_paired_difference_scenario() -> anyhow::Result<()> {
    let a = vec![summary(0, 5.0, 1.0), summary(1, 5.0, 1.0)];
    let b = vec![summary(0, 8.0, 1.0), summary(1, 9.0, 2.0)];
    let diffs = paired_difference(&a, &b)?;

    assert_approx_eq!(diffs[0].mean_diff, 3.0);
    assert_approx_eq!(diffs[1].mean_diff, 4.0);
    assert_approx_eq!(diffs[0].std_combined, 2f64.sqrt());
    assert_approx_eq!(diffs[1].std_combined, 5f64.sqrt());
    assert_eq!(diffs[1].replicate_diffs.len(), 3);

    let swapped = paired_difference(&b, &a)?;
    for (fwd, rev) in diffs.iter().zip(swapped.iter()) {
        assert_approx_eq!(fwd.mean_diff, -rev.mean_diff);
        assert_approx_eq!(fwd.std_combined, rev.std_combined);
    }

    assert!(matches!(
        paired_difference(&a, &b[..1]),
        Err(CytoError::SeriesMismatch { left: 2, right: 1 })
    ));
    Ok(())
}

#[test]
fn test_missing_prefix_skipped() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    DemoTableBuilder::new(&[FL1])
        .rows(&["01-A1", "01-A2", "01-A3", "01-A4", "01-A5", "01-A6"], &[
            1.0, 2.0, 3.0, 10.0, 11.0, 12.0,
        ])
        .with_summary_rows()
        .write(dir.path(), "table.csv")?;
    let config = write_config(
        dir.path(),
        &format!(
            r##"
experiment = "28-10-25"
input = "table.csv"
columns = ["{FL1}"]
labels = ["G1", "G2"]

[analysis]
kind = "conditions"

[analysis.conditions."01"]
condition = "Light"
color = "#d86ecc"

[analysis.conditions."02"]
condition = "Dark"
color = "#bfbfbf"
"##
        ),
    )?;

    let experiment = Experiment::from_path(&config)?;
    let table = experiment.load_table()?;
    let analyses = experiment.analyse(&table)?;
    assert_eq!(analyses.len(), 1);

    let analysis = &analyses[0];
    assert_eq!(analysis.skipped, vec!["Dark"]);
    assert_eq!(analysis.rows.len(), 2);
    assert!(analysis.rows.iter().all(|r| r.series == "Light"));
    assert_approx_eq!(analysis.rows[1].mean, 11.0);

    let Chart::Bars(chart) = &analysis.chart
    else {
        panic!("conditions analysis must give a bar chart");
    };
    assert_eq!(chart.series().len(), 1);
    assert_eq!(chart.series()[0].color, HexColor::PINK);
    Ok(())
}

#[test]
fn test_all_prefixes_missing_renders_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    DemoTableBuilder::new(&[FL1])
        .rows(&["03-A1", "03-A2", "03-A3"], &[1.0, 2.0, 3.0])
        .write(dir.path(), "table.csv")?;
    let config = write_config(
        dir.path(),
        &format!(
            r##"
experiment = "exp"
input = "table.csv"
output_dir = "{}"
columns = ["{FL1}"]
labels = ["G1"]

[analysis]
kind = "conditions"
conditions = {{ "01" = {{ condition = "Light", color = "#d86ecc" }} }}
"##,
            dir.path().join("plots").display()
        ),
    )?;

    let report = Experiment::from_path(&config)?.run()?;
    assert!(report.written.is_empty());
    assert_eq!(report.skipped, vec!["Light".to_string(), FL1.to_string()]);
    assert!(!dir.path().join("plots").exists());
    Ok(())
}

#[test]
fn test_label_mismatch_is_fatal() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    DemoTableBuilder::new(&[FL1])
        .rows(&["A1", "A2", "A3", "A4"], &[1.0, 2.0, 3.0, 4.0])
        .write(dir.path(), "table.csv")?;
    let config = write_config(
        dir.path(),
        &format!(
            r##"
experiment = "exp"
input = "table.csv"
columns = ["{FL1}"]
labels = ["only"]

[analysis]
kind = "bars"
"##
        ),
    )?;
    let result = Experiment::from_path(&config)?.run();
    assert!(matches!(result, Err(CytoError::LabelMismatch { .. })));
    Ok(())
}

#[test]
fn test_wash_differences() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let baseline = ["A1", "A2", "A3", "A4", "A5", "A6"];
    let treated = ["B1", "B2", "B3", "B4", "B5", "B6"];
    DemoTableBuilder::new(&[FL1])
        .rows(&baseline, &[4.0, 5.0, 6.0, 4.0, 5.0, 6.0])
        .rows(&treated, &[7.0, 8.0, 9.0, 8.0, 9.0, 10.0])
        .write(dir.path(), "table.csv")?;
    let config = write_config(
        dir.path(),
        &format!(
            r##"
experiment = "wash"
input = "table.csv"
columns = ["{FL1}"]

[analysis]
kind = "wash"

[[analysis.series]]
name = "ICR58"
color = "#d86ecc"
baseline_row = "A"
treated_row = "B"
"##
        ),
    )?;

    let experiment = Experiment::from_path(&config)?;
    let analyses = experiment.analyse(&experiment.load_table()?)?;
    let rows = &analyses[0].rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label, "0");
    assert_approx_eq!(rows[0].mean, 3.0);
    assert_approx_eq!(rows[1].mean, 4.0);
    assert_approx_eq!(rows[0].std, 2f64.sqrt());
    Ok(())
}

fn wash_config(
    dir: &Path,
    series: &[(&str, char, char)],
) -> anyhow::Result<std::path::PathBuf> {
    let mut body = format!(
        r##"
experiment = "wash"
input = "table.csv"
output_dir = "{}"
columns = ["{FL1}"]

[analysis]
kind = "wash"
"##,
        dir.join("plots").display()
    );
    for (name, baseline, treated) in series {
        body.push_str(&format!(
            r##"
[[analysis.series]]
name = "{name}"
color = "#d86ecc"
baseline_row = "{baseline}"
treated_row = "{treated}"
"##
        ));
    }
    write_config(dir, &body)
}

#[test]
fn test_wash_series_with_missing_row_skipped() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    DemoTableBuilder::new(&[FL1])
        .rows(&["A1", "A2", "A3"], &[4.0, 5.0, 6.0])
        .rows(&["B1", "B2", "B3"], &[7.0, 8.0, 9.0])
        .write(dir.path(), "table.csv")?;
    let config = wash_config(dir.path(), &[
        ("ICR58", 'A', 'B'),
        ("ICR66", 'A', 'C'),
        ("ICR90", 'D', 'B'),
    ])?;

    let experiment = Experiment::from_path(&config)?;
    let analyses = experiment.analyse(&experiment.load_table()?)?;
    assert_eq!(analyses[0].skipped, vec![
        "ICR66".to_string(),
        "ICR90".to_string()
    ]);
    assert_eq!(analyses[0].rows.len(), 1);
    assert_eq!(analyses[0].rows[0].series, "ICR58");
    assert_approx_eq!(analyses[0].rows[0].mean, 3.0);
    Ok(())
}

#[test]
fn test_wash_with_only_baseline_row_writes_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    DemoTableBuilder::new(&[FL1])
        .rows(&["A1", "A2", "A3"], &[4.0, 5.0, 6.0])
        .write(dir.path(), "table.csv")?;
    let config = wash_config(dir.path(), &[("ICR58", 'A', 'B')])?;

    let report = Experiment::from_path(&config)?.run()?;
    assert!(report.written.is_empty());
    assert_eq!(report.skipped, vec!["ICR58".to_string(), FL1.to_string()]);
    assert!(!dir.path().join("plots").exists());
    Ok(())
}

#[test]
fn test_regression_panels() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut table = DemoTableBuilder::new(&[FL1, FL2]);
    for (block, slope) in [(0, 2.0), (1, 3.0)] {
        for i in 0..4 {
            let x = (i + 1) as f64;
            table = table.row(&format!("{block}-{i}"), &[slope * x + 1.0, x]);
        }
    }
    table.write(dir.path(), "table.csv")?;
    let config = write_config(
        dir.path(),
        &format!(
            r##"
experiment = "bench"
input = "table.csv"
columns = ["{FL1}"]

[analysis]
kind = "regression"
x_column = "{FL2}"
block_size = 4
conditions = ["no-light", "light"]
"##
        ),
    )?;

    let experiment = Experiment::from_path(&config)?;
    let analyses = experiment.analyse(&experiment.load_table()?)?;
    let Chart::Regression(grid) = &analyses[0].chart
    else {
        panic!("regression analysis must give a regression grid");
    };
    assert_eq!(grid.panels().len(), 2);
    assert_eq!(grid.panels()[0].title, "no, light");
    let fit = grid.panels()[1].fit.expect("fit");
    assert_approx_eq!(fit.slope, 3.0);
    assert_approx_eq!(fit.intercept, 1.0);
    assert_approx_eq!(fit.r_squared(), 1.0);

    let svg = experiment.target(FL1).path(ImageFormat::Svg);
    assert_eq!(
        svg.file_name().and_then(|n| n.to_str()),
        Some("bench-regression-Geometric Mean-355nm405-30-H.svg")
    );
    Ok(())
}

#[test]
fn test_render_writes_dated_svg_and_png() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let date = NaiveDate::from_ymd_opt(2025, 10, 28).expect("valid date");
    let chart = BarChart::new("Construct", "Geometric Mean").with_series(
        BarSeries::new("Light", HexColor::PINK, vec![Bar {
            label:  "ICR58".to_string(),
            mean:   2.0,
            std:    1.0,
            points: vec![1.0, 2.0, 3.0],
        }]),
    );
    let target = OutputTarget::from_parts(dir.path(), &["exp", "light-dark"])
        .with_date(date);
    let style = PlotStyle::default().with_dpi(50.0);

    let paths = match chart.render(&target, &style, Some(7)) {
        Ok(paths) => paths,
        // Hosts without any system font cannot lay out text.
        Err(CytoError::Plot(msg)) => {
            eprintln!("skipping render check: {msg}");
            return Ok(());
        },
        Err(e) => return Err(e.into()),
    };
    assert_eq!(paths, vec![
        dir.path().join("svg/2025-10-28/exp-light-dark.svg"),
        dir.path().join("png/2025-10-28/exp-light-dark.png"),
    ]);
    assert!(paths.iter().all(|p| p.is_file()));
    let svg = std::fs::read_to_string(&paths[0])?;
    assert!(svg.contains("ICR58"));
    Ok(())
}

#[test]
fn test_render_tolerates_nan_error_bars() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let table = SampleTable::from_columns(["A1", "A2", "A3", "A4"], vec![(
        "value",
        vec![1.0, 2.0, 3.0, 7.0],
    )])?;
    let groups =
        BlockGrouper::default().group(&table, &labels(&["G1", "G2"]), "test")?;
    let summaries = summarize(&groups, "value", None)?;
    assert!(summaries[1].std.is_nan());

    let blank = Bar {
        label:  "blank".to_string(),
        mean:   f64::NAN,
        std:    f64::NAN,
        points: vec![f64::NAN],
    };
    let mut series = BarSeries::from_summaries("Light", HexColor::PINK, &summaries);
    series.bars.push(blank);
    let chart = BarChart::new("Construct", "Geometric Mean").with_series(series);
    let target = OutputTarget::new(dir.path(), "single-well");
    let style = PlotStyle::default().with_dpi(50.0);

    let paths = match chart.render(&target, &style, Some(7)) {
        Ok(paths) => paths,
        Err(CytoError::Plot(msg)) => {
            eprintln!("skipping render check: {msg}");
            return Ok(());
        },
        Err(e) => return Err(e.into()),
    };
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| p.is_file()));
    let svg = std::fs::read_to_string(&paths[0])?;
    assert!(!svg.contains("NaN"));
    Ok(())
}

#[test]
fn test_invalid_style_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_config(
        dir.path(),
        &format!(
            r##"
experiment = "exp"
input = "table.csv"
columns = ["{FL1}"]
labels = ["G1"]

[style]
jitter = nan

[analysis]
kind = "bars"
"##
        ),
    )?;
    assert!(matches!(
        Experiment::from_path(&config),
        Err(CytoError::Config(_))
    ));

    let chart = BarChart::new("x", "y").with_series(BarSeries::new(
        "a",
        HexColor::PINK,
        vec![Bar {
            label:  "G1".to_string(),
            mean:   1.0,
            std:    0.5,
            points: vec![0.5, 1.0, 1.5],
        }],
    ));
    let style = PlotStyle::default().with_jitter(f64::NAN);
    let target = OutputTarget::new(dir.path(), "bad");
    assert!(matches!(
        chart.render(&target, &style, Some(1)),
        Err(CytoError::Config(_))
    ));
    assert!(!dir.path().join("svg").exists());
    Ok(())
}

#[test]
fn test_regression_grid_keeps_tall_canvas_with_style_overrides(
) -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let regression = |style: &str| {
        format!(
            r##"
experiment = "bench"
input = "table.csv"
columns = ["{FL1}"]
{style}

[analysis]
kind = "regression"
x_column = "{FL2}"
block_size = 4
conditions = ["no-light", "light"]
"##
        )
    };

    let config = write_config(
        dir.path(),
        &regression("[style]\nfont_family = \"Arial\""),
    )?;
    let style = Experiment::from_path(&config)?.style();
    assert_eq!(style.font_family, "Arial");
    assert_approx_eq!(style.height_in(), PANEL_GRID_HEIGHT_IN);

    let config = write_config(dir.path(), &regression("[style]\nheight_in = 7.5"))?;
    assert_approx_eq!(Experiment::from_path(&config)?.style().height_in(), 7.5);
    Ok(())
}

#[test]
fn test_empty_chart_refuses_to_render() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let target = OutputTarget::new(dir.path(), "empty");
    let result = BarChart::new("x", "y").render(&target, &PlotStyle::default(), None);
    assert!(matches!(result, Err(CytoError::NothingToRender(_))));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

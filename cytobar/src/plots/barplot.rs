use itertools::Itertools;
use plotters::coord::combinators::BindKeyPoints;
use plotters::coord::Shift;
use plotters::prelude::*;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};

use super::{
    padded_range,
    Figure,
    Scaled,
};
use crate::data_structs::{
    Difference,
    GroupSummary,
    HexColor,
};
use crate::error::{
    CytoError,
    Result,
};

/// Share of one category slot covered by its bar cluster.
pub const BAR_SPAN: f64 = 0.8;

/// One bar: height, error and the raw values scattered over it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label:  String,
    pub mean:   f64,
    /// Error bar half-height. NaN draws no error bar.
    pub std:    f64,
    pub points: Vec<f64>,
}

impl From<&GroupSummary> for Bar {
    fn from(value: &GroupSummary) -> Self {
        Self {
            label:  value.label.clone(),
            mean:   value.mean,
            std:    value.std,
            points: value.values.clone(),
        }
    }
}

impl From<&Difference> for Bar {
    fn from(value: &Difference) -> Self {
        Self {
            label:  value.label.clone(),
            mean:   value.mean_diff,
            std:    value.std_combined,
            points: value.replicate_diffs.clone(),
        }
    }
}

/// Bars sharing a legend entry and a color, e.g. one condition.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name:  String,
    pub color: HexColor,
    pub bars:  Vec<Bar>,
}

impl BarSeries {
    pub fn new(
        name: impl Into<String>,
        color: HexColor,
        bars: Vec<Bar>,
    ) -> Self {
        Self {
            name: name.into(),
            color,
            bars,
        }
    }

    pub fn from_summaries(
        name: impl Into<String>,
        color: HexColor,
        summaries: &[GroupSummary],
    ) -> Self {
        Self::new(name, color, summaries.iter().map(Bar::from).collect())
    }

    pub fn from_differences(
        name: impl Into<String>,
        color: HexColor,
        differences: &[Difference],
    ) -> Self {
        Self::new(name, color, differences.iter().map(Bar::from).collect())
    }
}

/// Grouped bar chart keyed by bar label.
///
/// Categories are the bar labels in first-seen order across all series.
/// Each series gets one bar per category it has data for; series are drawn
/// side by side inside each category slot.
#[derive(Debug, Clone, Default)]
pub struct BarChart {
    series:  Vec<BarSeries>,
    x_label: String,
    y_label: String,
}

impl BarChart {
    pub fn new(
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            series:  Vec::new(),
            x_label: x_label.into(),
            y_label: y_label.into(),
        }
    }

    pub fn with_series(
        mut self,
        series: BarSeries,
    ) -> Self {
        self.series.push(series);
        self
    }

    pub fn push_series(
        &mut self,
        series: BarSeries,
    ) {
        self.series.push(series);
    }

    pub fn series(&self) -> &[BarSeries] {
        &self.series
    }

    pub fn categories(&self) -> Vec<&str> {
        self.series
            .iter()
            .flat_map(|s| s.bars.iter().map(|b| b.label.as_str()))
            .unique()
            .collect()
    }

    pub fn bar_width(&self) -> f64 {
        BAR_SPAN / self.series.len().max(1) as f64
    }

    /// X position of the bar of series `series_idx` in category `category`.
    pub fn bar_center(
        &self,
        series_idx: usize,
        category: usize,
    ) -> f64 {
        let n = self.series.len().max(1) as f64;
        category as f64 + (series_idx as f64 - (n - 1.0) / 2.0) * self.bar_width()
    }

    fn y_range(&self) -> (f64, f64) {
        padded_range(self.series.iter().flat_map(|s| &s.bars).flat_map(|b| {
            let err = if b.std.is_finite() { b.std } else { 0.0 };
            [b.mean - err, b.mean + err]
                .into_iter()
                .chain(b.points.iter().copied())
        }))
    }

    fn show_legend(&self) -> bool {
        self.series.iter().any(|s| !s.name.is_empty())
    }
}

/// `n` horizontal offsets drawn uniformly from `[-half_width, half_width]`.
pub fn jitter_offsets<R: Rng>(
    n: usize,
    half_width: f64,
    rng: &mut R,
) -> Vec<f64> {
    let half_width = half_width.abs();
    let dist = Uniform::new_inclusive(-half_width, half_width);
    (0..n).map(|_| rng.sample(dist)).collect()
}

/// Half the cap length in x data units, given `slots` categories spread over
/// `plot_px` pixels. Never wider than the bar.
pub fn cap_half_width(
    cap_px: f64,
    plot_px: u32,
    slots: usize,
    bar_width: f64,
) -> f64 {
    let units_per_px = slots.max(1) as f64 / plot_px.max(1) as f64;
    (cap_px / 2.0 * units_per_px).min(bar_width / 2.0)
}

impl Figure for BarChart {
    fn check(&self) -> Result<()> {
        if self.series.iter().all(|s| s.bars.is_empty()) {
            return Err(CytoError::NothingToRender(
                "bar chart has no bars".to_string(),
            ));
        }
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: Scaled<'_>,
        seed: u64,
    ) -> Result<()> {
        let s = style.style;
        let family = s.font_family.as_str();
        let categories = self.categories();
        let width = self.bar_width();
        let (y_lo, y_hi) = self.y_range();
        let key_points = (0..categories.len()).map(|i| i as f64).collect_vec();

        let mut chart = ChartBuilder::on(root)
            .margin(style.px(12.0))
            .x_label_area_size(style.px(s.label_font_size * 3.5))
            .y_label_area_size(style.px(s.label_font_size * 6.0))
            .build_cartesian_2d(
                (-0.5..categories.len() as f64 - 0.5).with_key_points(key_points),
                y_lo..y_hi,
            )
            .map_err(CytoError::plot)?;

        let line = style.px(s.line_width);
        let label_of = |x: &f64| {
            let idx = x.round();
            if idx < 0.0 {
                return String::new();
            }
            categories
                .get(idx as usize)
                .map(|c| c.to_string())
                .unwrap_or_default()
        };
        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .x_labels(categories.len())
            .x_label_formatter(&label_of)
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .label_style((family, style.font_px(s.tick_font_size)))
            .axis_desc_style((family, style.font_px(s.label_font_size)))
            .axis_style(BLACK.stroke_width(line))
            .light_line_style(TRANSPARENT)
            .bold_line_style(BLACK.mix(0.15).stroke_width(line));
        if !s.grid {
            mesh.disable_y_mesh();
        }
        mesh.draw().map_err(CytoError::plot)?;

        let (plot_px, _) = chart.plotting_area().dim_in_pixel();
        let cap = cap_half_width(
            style.px_f64(s.cap_size),
            plot_px,
            categories.len(),
            width,
        );
        let radius = style.px(s.dot_size);
        let legend_half = style.px(5.0) as i32;

        for (series_idx, series) in self.series.iter().enumerate() {
            let color: RGBColor = series.color.into();
            let fill = color.mix(s.bar_alpha);
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(series_idx as u64));
            let placed = series
                .bars
                .iter()
                .filter_map(|bar| {
                    categories
                        .iter()
                        .position(|c| *c == bar.label)
                        .map(|cat| (self.bar_center(series_idx, cat), bar))
                })
                .collect_vec();

            let finite = || placed.iter().filter(|(_, bar)| bar.mean.is_finite());
            chart
                .draw_series(finite().map(|&(x, bar)| {
                    Rectangle::new(
                        [(x - width / 2.0, 0.0), (x + width / 2.0, bar.mean)],
                        fill.filled(),
                    )
                }))
                .map_err(CytoError::plot)?
                .label(series.name.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new(
                        [
                            (x, y - legend_half),
                            (x + 2 * legend_half, y + legend_half),
                        ],
                        fill.filled(),
                    )
                });
            chart
                .draw_series(finite().map(|&(x, bar)| {
                    Rectangle::new(
                        [(x - width / 2.0, 0.0), (x + width / 2.0, bar.mean)],
                        BLACK.stroke_width(line),
                    )
                }))
                .map_err(CytoError::plot)?;

            // Error bars: stem plus caps; NaN std draws nothing.
            chart
                .draw_series(
                    finite()
                        .filter(|(_, bar)| bar.std.is_finite())
                        .flat_map(|&(x, bar)| {
                            let (lo, hi) = (bar.mean - bar.std, bar.mean + bar.std);
                            [
                                vec![(x, lo), (x, hi)],
                                vec![(x - cap, lo), (x + cap, lo)],
                                vec![(x - cap, hi), (x + cap, hi)],
                            ]
                        })
                        .map(|points| PathElement::new(points, BLACK.stroke_width(line))),
                )
                .map_err(CytoError::plot)?;

            let dots = placed
                .iter()
                .flat_map(|&(x, bar)| {
                    let offsets = jitter_offsets(bar.points.len(), s.jitter, &mut rng);
                    bar.points
                        .iter()
                        .zip(offsets)
                        .filter(|(v, _)| v.is_finite())
                        .map(move |(v, dx)| (x + dx, *v))
                        .collect_vec()
                })
                .collect_vec();
            chart
                .draw_series(
                    dots.into_iter()
                        .map(|point| Circle::new(point, radius, color.filled())),
                )
                .map_err(CytoError::plot)?;
        }

        if self.show_legend() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(TRANSPARENT)
                .label_font((family, style.font_px(s.legend_font_size)))
                .draw()
                .map_err(CytoError::plot)?;
        }
        Ok(())
    }
}

use itertools::Itertools;
use log::warn;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{
    Figure,
    Scaled,
};
use crate::data_structs::HexColor;
use crate::error::{
    CytoError,
    Result,
};
use crate::tools::regression::{
    linear_regression,
    LinearFit,
};

/// One scatter panel and, when the data allows it, its fitted line.
#[derive(Debug, Clone)]
pub struct RegressionPanel {
    pub title: String,
    pub x:     Vec<f64>,
    pub y:     Vec<f64>,
    pub fit:   Option<LinearFit>,
}

impl RegressionPanel {
    /// Fits `y` against `x`.
    ///
    /// Data too degenerate for a fit still gives a panel, without the line.
    pub fn fitted(
        title: impl Into<String>,
        x: Vec<f64>,
        y: Vec<f64>,
    ) -> Result<Self> {
        let title = title.into();
        let fit = match linear_regression(&x, &y) {
            Ok(fit) => Some(fit),
            Err(CytoError::DataFormat(msg)) => {
                warn!("{title}: no fit drawn, {msg}");
                None
            },
            Err(e) => return Err(e),
        };
        Ok(Self { title, x, y, fit })
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| (*x, *y))
    }
}

/// Panels laid out row-major in a grid with shared axes.
#[derive(Debug, Clone)]
pub struct RegressionGrid {
    panels:  Vec<RegressionPanel>,
    x_label: String,
    y_label: String,
    color:   HexColor,
    columns: usize,
}

impl RegressionGrid {
    pub fn new(
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        color: HexColor,
    ) -> Self {
        Self {
            panels: Vec::new(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            color,
            columns: 2,
        }
    }

    pub fn with_columns(
        mut self,
        columns: usize,
    ) -> Self {
        self.columns = columns.max(1);
        self
    }

    pub fn push_panel(
        &mut self,
        panel: RegressionPanel,
    ) {
        self.panels.push(panel);
    }

    pub fn panels(&self) -> &[RegressionPanel] {
        &self.panels
    }

    /// Grid shape as `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.panels.len().div_ceil(self.columns), self.columns)
    }
}

/// Data range padded by 5% on both sides.
fn span<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    match values.into_iter().minmax() {
        itertools::MinMaxResult::NoElements => (0.0, 1.0),
        itertools::MinMaxResult::OneElement(v) => (v - 0.5, v + 0.5),
        itertools::MinMaxResult::MinMax(lo, hi) if lo == hi => (lo - 0.5, hi + 0.5),
        itertools::MinMaxResult::MinMax(lo, hi) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        },
    }
}

impl Figure for RegressionGrid {
    fn check(&self) -> Result<()> {
        if self.panels.iter().all(|p| p.points().next().is_none()) {
            return Err(CytoError::NothingToRender(
                "regression grid has no points".to_string(),
            ));
        }
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: Scaled<'_>,
        _seed: u64,
    ) -> Result<()> {
        let s = style.style;
        let family = s.font_family.as_str();
        let color: RGBColor = self.color.into();
        let line = style.px(s.line_width);
        let (x_lo, x_hi) = span(self.panels.iter().flat_map(|p| p.points().map(|(x, _)| x)));
        let (y_lo, y_hi) = span(self.panels.iter().flat_map(|p| p.points().map(|(_, y)| y)));

        let areas = root.split_evenly(self.shape());
        for (panel, area) in self.panels.iter().zip(areas.iter()) {
            let mut chart = ChartBuilder::on(area)
                .caption(&panel.title, (family, style.font_px(s.title_font_size)))
                .margin(style.px(8.0))
                .x_label_area_size(style.px(s.label_font_size * 3.0))
                .y_label_area_size(style.px(s.label_font_size * 5.0))
                .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
                .map_err(CytoError::plot)?;

            let mut mesh = chart.configure_mesh();
            mesh.x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .label_style((family, style.font_px(s.tick_font_size)))
                .axis_desc_style((family, style.font_px(s.label_font_size)))
                .axis_style(BLACK.stroke_width(line))
                .light_line_style(TRANSPARENT)
                .bold_line_style(BLACK.mix(0.15).stroke_width(line));
            if !s.grid {
                mesh.disable_mesh();
            }
            mesh.draw().map_err(CytoError::plot)?;

            chart
                .draw_series(panel.points().map(|point| {
                    Circle::new(point, style.px(s.dot_size), color.mix(0.8).filled())
                }))
                .map_err(CytoError::plot)?;

            let Some(fit) = panel.fit
            else {
                continue;
            };
            chart
                .draw_series(LineSeries::new(
                    [(x_lo, fit.predict(x_lo)), (x_hi, fit.predict(x_hi))],
                    color.stroke_width(2 * line),
                ))
                .map_err(CytoError::plot)?;

            let font = (family, style.font_px(s.legend_font_size)).into_font();
            let line_height = (style.font_px(s.legend_font_size) * 1.3).round() as i32;
            let anchor = (x_lo + (x_hi - x_lo) * 0.05, y_hi - (y_hi - y_lo) * 0.05);
            chart
                .draw_series(fit.annotation().into_iter().enumerate().map(
                    |(i, text)| {
                        EmptyElement::at(anchor)
                            + Text::new(text, (0, i as i32 * line_height), font.clone())
                    },
                ))
                .map_err(CytoError::plot)?;
        }
        Ok(())
    }
}

use serde::Deserialize;

use super::ImageFormat;
use crate::error::{
    CytoError,
    Result,
};
use crate::with_field_fn;

/// Pixels per inch of the SVG canvas.
const SVG_PX_PER_INCH: f64 = 100.0;
const POINTS_PER_INCH: f64 = 72.0;
pub const DEFAULT_HEIGHT_IN: f64 = 6.0;
pub const PANEL_GRID_HEIGHT_IN: f64 = 10.0;

/// Explicit chart styling handed to every renderer.
///
/// Lengths are in typographic points and scaled per output format, so the
/// SVG and PNG exports share one layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotStyle {
    pub font_family:      String,
    pub tick_font_size:   f64,
    pub label_font_size:  f64,
    pub legend_font_size: f64,
    pub title_font_size:  f64,
    pub width_in:         f64,
    /// Canvas height; each chart kind picks its own when unset.
    pub height_in:        Option<f64>,
    /// Raster resolution of the PNG export.
    pub dpi:              f64,
    pub bar_alpha:        f64,
    pub dot_size:         f64,
    /// Half-width of the uniform horizontal jitter, in bar-position units.
    pub jitter:           f64,
    pub line_width:       f64,
    /// Full length of the error bar caps, in points.
    pub cap_size:         f64,
    pub grid:             bool,
    /// Leave the SVG background unpainted.
    pub transparent:      bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            font_family:      "sans-serif".to_string(),
            tick_font_size:   12.0,
            label_font_size:  13.0,
            legend_font_size: 12.0,
            title_font_size:  12.0,
            width_in:         12.0,
            height_in:        None,
            dpi:              300.0,
            bar_alpha:        0.5,
            dot_size:         3.0,
            jitter:           0.06,
            line_width:       0.8,
            cap_size:         4.0,
            grid:             true,
            transparent:      true,
        }
    }
}

impl PlotStyle {
    with_field_fn!(font_family, String);
    with_field_fn!(width_in, f64);
    with_field_fn!(dpi, f64);
    with_field_fn!(bar_alpha, f64);
    with_field_fn!(jitter, f64);
    with_field_fn!(grid, bool);
    with_field_fn!(transparent, bool);

    pub fn with_height_in(
        mut self,
        height_in: f64,
    ) -> Self {
        self.height_in = Some(height_in);
        self
    }

    /// Sets the height unless one was configured.
    pub fn with_default_height_in(
        mut self,
        height_in: f64,
    ) -> Self {
        self.height_in.get_or_insert(height_in);
        self
    }

    /// Style for multi-panel figures, 12 x 10 inches.
    pub fn panel_grid() -> Self {
        Self::default().with_height_in(PANEL_GRID_HEIGHT_IN)
    }

    pub fn height_in(&self) -> f64 {
        self.height_in.unwrap_or(DEFAULT_HEIGHT_IN)
    }

    /// Rejects lengths, resolutions and opacities no chart can be drawn
    /// with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("tick_font_size", self.tick_font_size),
            ("label_font_size", self.label_font_size),
            ("legend_font_size", self.legend_font_size),
            ("title_font_size", self.title_font_size),
            ("width_in", self.width_in),
            ("height_in", self.height_in()),
            ("dpi", self.dpi),
            ("line_width", self.line_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CytoError::config(format!(
                    "style.{name} must be a positive number, got {value}"
                )));
            }
        }
        let non_negative = [
            ("dot_size", self.dot_size),
            ("jitter", self.jitter),
            ("cap_size", self.cap_size),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CytoError::config(format!(
                    "style.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.bar_alpha) {
            return Err(CytoError::config(format!(
                "style.bar_alpha must lie in [0, 1], got {}",
                self.bar_alpha
            )));
        }
        Ok(())
    }

    fn px_per_inch(
        &self,
        format: ImageFormat,
    ) -> f64 {
        match format {
            ImageFormat::Svg => SVG_PX_PER_INCH,
            ImageFormat::Png => self.dpi,
        }
    }

    /// Pixels per point for `format`.
    pub fn scale(
        &self,
        format: ImageFormat,
    ) -> f64 {
        self.px_per_inch(format) / POINTS_PER_INCH
    }

    /// Canvas size in pixels for `format`.
    pub fn pixel_size(
        &self,
        format: ImageFormat,
    ) -> (u32, u32) {
        let ppi = self.px_per_inch(format);
        (
            (self.width_in * ppi).round().max(1.0) as u32,
            (self.height_in() * ppi).round().max(1.0) as u32,
        )
    }
}

/// A [`PlotStyle`] resolved to pixels for one output format.
#[derive(Debug, Clone, Copy)]
pub struct Scaled<'a> {
    pub style: &'a PlotStyle,
    pub scale: f64,
}

impl<'a> Scaled<'a> {
    pub fn new(
        style: &'a PlotStyle,
        format: ImageFormat,
    ) -> Self {
        Self {
            style,
            scale: style.scale(format),
        }
    }

    /// Converts points to whole pixels, never below one.
    pub fn px(
        &self,
        points: f64,
    ) -> u32 {
        (points * self.scale).round().max(1.0) as u32
    }

    pub fn font_px(
        &self,
        points: f64,
    ) -> f64 {
        self.px_f64(points)
    }

    /// Converts points to fractional pixels.
    pub fn px_f64(
        &self,
        points: f64,
    ) -> f64 {
        points * self.scale
    }
}

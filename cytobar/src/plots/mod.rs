//! Chart rendering on top of [`plotters`].
//!
//! Every chart implements [`Figure`]: it knows how to draw itself onto any
//! plotters backend, and [`Figure::render`] writes it once per
//! [`ImageFormat`] into the directory layout described by [`OutputTarget`].
//! Styling comes from an explicit [`PlotStyle`] value; nothing is global.
//!
//! - [`BarChart`]: grouped bars with error bars and jittered replicate
//!   points.
//! - [`RegressionGrid`]: scatter panels with fitted lines and annotations.

mod barplot;
mod output;
mod regplot;
mod style;

use std::path::PathBuf;

pub use barplot::{
    jitter_offsets,
    Bar,
    BarChart,
    BarSeries,
    BAR_SPAN,
};
use log::info;
pub use output::{
    ImageFormat,
    OutputTarget,
};
use plotters::coord::Shift;
use plotters::prelude::*;
pub use regplot::{
    RegressionGrid,
    RegressionPanel,
};
pub use style::{
    PlotStyle,
    Scaled,
    DEFAULT_HEIGHT_IN,
    PANEL_GRID_HEIGHT_IN,
};

use crate::data_structs::HexColor;
use crate::error::{
    CytoError,
    Result,
};

impl From<HexColor> for RGBColor {
    fn from(value: HexColor) -> Self {
        RGBColor(value.r, value.g, value.b)
    }
}

/// A chart that can be drawn onto any plotters backend.
pub trait Figure {
    /// Fails with [`CytoError::NothingToRender`] when there is no data.
    fn check(&self) -> Result<()>;

    /// Draws the chart. `seed` drives every random element (jitter).
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: Scaled<'_>,
        seed: u64,
    ) -> Result<()>;

    /// Writes one file per [`ImageFormat`] and returns their paths.
    ///
    /// Both files are drawn with the same seed, so their jitter matches.
    fn render(
        &self,
        target: &OutputTarget,
        style: &PlotStyle,
        seed: Option<u64>,
    ) -> Result<Vec<PathBuf>> {
        self.render_formats(target, style, seed, &ImageFormat::ALL)
    }

    /// Like [`Figure::render`], restricted to `formats`.
    fn render_formats(
        &self,
        target: &OutputTarget,
        style: &PlotStyle,
        seed: Option<u64>,
        formats: &[ImageFormat],
    ) -> Result<Vec<PathBuf>> {
        self.check()?;
        style.validate()?;
        let seed = seed.unwrap_or_else(rand::random);

        formats
            .iter()
            .map(|&format| {
                let path = target.prepare(format)?;
                let size = style.pixel_size(format);
                let scaled = Scaled::new(style, format);
                match format {
                    ImageFormat::Svg => {
                        let root =
                            SVGBackend::new(&path, size).into_drawing_area();
                        if !style.transparent {
                            root.fill(&WHITE).map_err(CytoError::plot)?;
                        }
                        self.draw(&root, scaled, seed)?;
                        root.present().map_err(CytoError::plot)?;
                    },
                    ImageFormat::Png => {
                        let root =
                            BitMapBackend::new(&path, size).into_drawing_area();
                        root.fill(&WHITE).map_err(CytoError::plot)?;
                        self.draw(&root, scaled, seed)?;
                        root.present().map_err(CytoError::plot)?;
                    },
                }
                info!("Saved {}", path.display());
                Ok(path)
            })
            .collect()
    }
}

/// Lower and upper axis bound covering `values` and zero, padded by 5%.
pub(crate) fn padded_range<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>, {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0f64, 0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = hi - lo;
    if span == 0.0 {
        return (lo - 0.5, hi + 1.0);
    }
    let pad = span * 0.05;
    (if lo < 0.0 { lo - pad } else { lo }, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range_includes_zero() {
        let (lo, hi) = padded_range([5.0, 10.0]);
        assert_eq!(lo, 0.0);
        assert!((hi - 10.5).abs() < 1e-12);

        let (lo, hi) = padded_range([-4.0, 6.0, f64::NAN]);
        assert!((lo + 4.5).abs() < 1e-12);
        assert!((hi - 6.5).abs() < 1e-12);
    }

    #[test]
    fn test_padded_range_degenerate() {
        let (lo, hi) = padded_range(std::iter::empty());
        assert!(lo < 0.0 && hi > 0.0);
    }
}

use std::path::{
    Path,
    PathBuf,
};

use chrono::{
    Local,
    NaiveDate,
};
use itertools::Itertools;

use crate::error::Result;

/// Image formats written for every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "console", derive(clap::ValueEnum))]
pub enum ImageFormat {
    /// Scalable vector graphics.
    Svg,
    /// Raster image at the style's dpi.
    Png,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 2] = [ImageFormat::Svg, ImageFormat::Png];

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

/// Where one chart is written: `<root>/<ext>/<date>/<stem>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    root: PathBuf,
    date: NaiveDate,
    stem: String,
}

impl OutputTarget {
    /// Target dated today.
    pub fn new(
        root: impl Into<PathBuf>,
        stem: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            date: Local::now().date_naive(),
            stem: sanitize(&stem.into()),
        }
    }

    /// Joins the non-empty `parts` with `-` into a file stem.
    pub fn from_parts<S: AsRef<str>>(
        root: impl Into<PathBuf>,
        parts: &[S],
    ) -> Self {
        let stem = parts
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .join("-");
        Self::new(root, stem)
    }

    pub fn with_date(
        mut self,
        date: NaiveDate,
    ) -> Self {
        self.date = date;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn path(
        &self,
        format: ImageFormat,
    ) -> PathBuf {
        let ext = format.extension();
        self.root
            .join(ext)
            .join(self.date.format("%Y-%m-%d").to_string())
            .join(format!("{}.{ext}", self.stem))
    }

    /// Creates the parent directory of the `format` file and returns its path.
    pub fn prepare(
        &self,
        format: ImageFormat,
    ) -> Result<PathBuf> {
        let path = self.path(format);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }
}

/// Path separators in a stem would create stray directories.
fn sanitize(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let target = OutputTarget::from_parts("plots", &[
            "28-10-25",
            "light-dark",
            "Geometric Mean",
            "355nm405-30-A",
        ])
        .with_date(NaiveDate::from_ymd_opt(2025, 10, 28).unwrap());
        assert_eq!(
            target.path(ImageFormat::Svg),
            PathBuf::from(
                "plots/svg/2025-10-28/28-10-25-light-dark-Geometric \
                 Mean-355nm405-30-A.svg"
            )
        );
        assert_eq!(
            target.path(ImageFormat::Png).extension().unwrap(),
            "png"
        );
    }

    #[test]
    fn test_empty_parts_and_separators() {
        let target = OutputTarget::from_parts("out", &["exp", "", "a/b"]);
        assert_eq!(target.stem(), "exp-a_b");
    }
}

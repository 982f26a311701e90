#![allow(dead_code)]
use std::fs::File;
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use itertools::Itertools;

pub const FL1: &str =
    "cells/Single Cells | Geometric Mean (FL1-H :: 355nm405-30-H)";
pub const FL2: &str =
    "cells/Single Cells | Geometric Mean (FL2-A :: 355nm450-45-A)";

/// FlowJo-like export: identifier column, measurement columns, and
/// optionally the trailing `Mean`/`SD` summary rows. NaN values are written
/// as blank cells.
pub struct DemoTableBuilder {
    id_header: String,
    columns:   Vec<String>,
    rows:      Vec<(String, Vec<f64>)>,
    summary:   bool,
}

impl DemoTableBuilder {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            id_header: "Name".to_string(),
            columns:   columns.iter().map(|c| c.to_string()).collect(),
            rows:      Vec::new(),
            summary:   false,
        }
    }

    pub fn with_id_header(
        mut self,
        header: &str,
    ) -> Self {
        self.id_header = header.to_string();
        self
    }

    pub fn with_summary_rows(mut self) -> Self {
        self.summary = true;
        self
    }

    pub fn row(
        mut self,
        well: &str,
        values: &[f64],
    ) -> Self {
        assert_eq!(values.len(), self.columns.len());
        self.rows.push((well.to_string(), values.to_vec()));
        self
    }

    /// One row per well with the same value in every column.
    pub fn rows(
        mut self,
        wells: &[&str],
        values: &[f64],
    ) -> Self {
        for (well, value) in wells.iter().zip(values) {
            let row = vec![*value; self.columns.len()];
            self.rows.push((well.to_string(), row));
        }
        self
    }

    pub fn to_csv(&self) -> String {
        let mut lines = vec![std::iter::once(&self.id_header)
            .chain(self.columns.iter())
            .map(|c| format!("\"{c}\""))
            .join(",")];
        let mut rows = self.rows.clone();
        if self.summary {
            let n = self.columns.len();
            rows.push(("Mean".to_string(), vec![1000.0; n]));
            rows.push(("SD".to_string(), vec![10.0; n]));
        }
        for (well, values) in rows {
            lines.push(
                std::iter::once(format!("\"{well}\""))
                    .chain(values.iter().map(|v| {
                        if v.is_nan() {
                            String::new()
                        }
                        else {
                            v.to_string()
                        }
                    }))
                    .join(","),
            );
        }
        lines.join("\n") + "\n"
    }

    pub fn write(
        &self,
        dir: &Path,
        name: &str,
    ) -> anyhow::Result<PathBuf> {
        let path = dir.join(name);
        let mut file = File::create(&path)?;
        file.write_all(self.to_csv().as_bytes())?;
        Ok(path)
    }
}

pub fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

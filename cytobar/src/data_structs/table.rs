use itertools::Itertools;
use polars::prelude::*;

use crate::error::{
    CytoError,
    Result,
};

/// Name of the identifier column after loading.
pub const WELL_COL: &str = "Well";

/// Ordered sample table backed by a [`DataFrame`].
///
/// The first column is always [`WELL_COL`] (string). Every other column is an
/// opaque measurement column. Row order encodes replicate and condition
/// membership and is never changed.
#[derive(Debug, Clone)]
pub struct SampleTable {
    data: DataFrame,
}

impl SampleTable {
    /// Wraps a frame, checking that it carries a string well column.
    pub fn try_new(data: DataFrame) -> Result<Self> {
        let well = data.column(WELL_COL).map_err(|_| {
            CytoError::data_format(format!(
                "identifier column '{WELL_COL}' is missing"
            ))
        })?;
        if !matches!(well.dtype(), DataType::String) {
            return Err(CytoError::data_format(format!(
                "identifier column '{WELL_COL}' must hold strings, found {}",
                well.dtype()
            )));
        }
        Ok(Self { data })
    }

    /// Builds a table from well labels and named measurement columns.
    pub fn from_columns<W, S>(
        wells: W,
        columns: Vec<(&str, Vec<f64>)>,
    ) -> Result<Self>
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>, {
        let wells = wells
            .into_iter()
            .map(|w| w.as_ref().to_string())
            .collect_vec();
        let mut frame_columns =
            vec![Column::new(PlSmallStr::from(WELL_COL), wells)];
        for (name, values) in columns {
            frame_columns.push(Column::new(PlSmallStr::from(name), values));
        }
        Self::try_new(DataFrame::new(frame_columns)?)
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Well identifiers in row order. Null identifiers become empty strings.
    pub fn wells(&self) -> Result<Vec<String>> {
        Ok(self
            .data
            .column(WELL_COL)?
            .str()?
            .into_iter()
            .map(|w| w.unwrap_or_default().to_string())
            .collect())
    }

    /// Names of the measurement columns, in file order.
    pub fn measurement_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != WELL_COL)
            .map(|name| name.to_string())
            .collect()
    }

    /// Values of one measurement column as `f64`; nulls become NaN.
    pub fn values(
        &self,
        column: &str,
    ) -> Result<Vec<f64>> {
        let series = self.data.column(column).map_err(|_| {
            CytoError::data_format(format!("column '{column}' not found"))
        })?;
        let casted = series.cast(&DataType::Float64).map_err(|e| {
            CytoError::data_format(format!(
                "column '{column}' is not numeric: {e}"
            ))
        })?;
        Ok(casted
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    /// Contiguous rows `offset..offset + len`, clamped to the table.
    pub fn slice(
        &self,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            data: self.data.slice(offset as i64, len),
        }
    }

    /// Rows at the given positions, in the given order.
    pub fn take_rows(
        &self,
        rows: &[usize],
    ) -> Result<Self> {
        let idx = IdxCa::from_vec(
            PlSmallStr::from("idx"),
            rows.iter().map(|&r| r as IdxSize).collect(),
        );
        Ok(Self {
            data: self.data.take(&idx)?,
        })
    }

    /// Keeps the rows whose well identifier satisfies `predicate`.
    pub fn filter_wells<F>(
        &self,
        predicate: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> bool, {
        let mask = self
            .wells()?
            .iter()
            .map(|w| predicate(w))
            .collect_vec();
        let mask = BooleanChunked::from_slice(PlSmallStr::from("mask"), &mask);
        Ok(Self {
            data: self.data.filter(&mask)?,
        })
    }

    /// Structural equality including nulls.
    pub fn equals(
        &self,
        other: &SampleTable,
    ) -> bool {
        self.data.equals_missing(&other.data)
    }
}

use std::fs::File;
use std::path::Path;

use itertools::Itertools;
use log::debug;
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;

use crate::data_structs::{
    SampleTable,
    WELL_COL,
};
use crate::error::{
    CytoError,
    Result,
};
use crate::with_field_fn;

/// Summary rows FlowJo appends below the sample rows.
pub const DEFAULT_SENTINELS: [&str; 2] = ["Mean", "SD"];

/// Loads cytometry export tables into [`SampleTable`]s.
///
/// The identifier column (the first column unless [`Self::with_id_column`]
/// names another) is renamed to [`WELL_COL`] and moved to the front. Then the
/// last `skip_tail` rows are dropped, followed by every row whose identifier
/// equals one of the sentinels.
#[derive(Debug, Clone)]
pub struct TableReaderBuilder {
    sentinels:           Vec<String>,
    skip_tail:           usize,
    strip_suffix:        Option<String>,
    id_column:           Option<String>,
    infer_schema_length: Option<usize>,
}

impl Default for TableReaderBuilder {
    fn default() -> Self {
        Self {
            sentinels:           DEFAULT_SENTINELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skip_tail:           0,
            strip_suffix:        None,
            id_column:           None,
            infer_schema_length: Some(1000),
        }
    }
}

impl TableReaderBuilder {
    with_field_fn!(sentinels, Vec<String>);
    with_field_fn!(skip_tail, usize);
    with_field_fn!(strip_suffix, Option<String>);
    with_field_fn!(id_column, Option<String>);
    with_field_fn!(infer_schema_length, Option<usize>);

    fn read_options(&self) -> CsvReadOptions {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
    }

    /// Reads and cleans the table stored at `path`.
    pub fn read_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<SampleTable> {
        let path = path.as_ref();
        debug!("Reading sample table from {}", path.display());
        let handle = File::open(path)?;
        self.read_handle(handle)
    }

    /// Reads and cleans a table from any seekable byte source.
    pub fn read_handle<R: MmapBytesReader>(
        &self,
        handle: R,
    ) -> Result<SampleTable> {
        let frame = self
            .read_options()
            .into_reader_with_file_handle(handle)
            .finish()?;
        self.clean(frame)
    }

    fn clean(
        &self,
        frame: DataFrame,
    ) -> Result<SampleTable> {
        let names = frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect_vec();
        let id_name = match (&self.id_column, names.first()) {
            (Some(wanted), _) if names.contains(wanted) => wanted.clone(),
            (Some(wanted), _) => {
                return Err(CytoError::data_format(format!(
                    "identifier column '{wanted}' not found in {names:?}"
                )))
            },
            (None, Some(first)) => first.clone(),
            (None, None) => {
                return Err(CytoError::data_format(
                    "table has no identifier column",
                ))
            },
        };
        if id_name != WELL_COL && names.iter().any(|n| n == WELL_COL) {
            return Err(CytoError::data_format(format!(
                "cannot rename '{id_name}' to '{WELL_COL}': name already taken"
            )));
        }

        let wells = frame
            .column(&id_name)?
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|w| self.clean_well(w.unwrap_or_default()))
            .collect_vec();
        let mut columns =
            vec![Column::new(PlSmallStr::from(WELL_COL), wells)];
        columns.extend(
            frame
                .get_columns()
                .iter()
                .filter(|c| c.name().as_str() != id_name)
                .cloned(),
        );
        let mut frame = DataFrame::new(columns)?;

        let keep = frame.height().saturating_sub(self.skip_tail);
        if keep < frame.height() {
            debug!("Dropping {} trailing rows", frame.height() - keep);
            frame = frame.slice(0, keep);
        }

        let table = SampleTable::try_new(frame)?;
        let before = table.len();
        let table = table
            .filter_wells(|w| !self.sentinels.iter().any(|s| s == w))?;
        debug!(
            "Loaded {} sample rows ({} sentinel rows removed)",
            table.len(),
            before - table.len()
        );
        Ok(table)
    }

    fn clean_well(
        &self,
        raw: &str,
    ) -> String {
        let trimmed = raw.trim();
        match &self.strip_suffix {
            Some(suffix) => trimmed
                .strip_suffix(suffix.as_str())
                .unwrap_or(trimmed)
                .trim()
                .to_string(),
            None => trimmed.to_string(),
        }
    }
}

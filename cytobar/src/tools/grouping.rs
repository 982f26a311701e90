//! Partitioning of sample tables into labelled replicate groups.
//!
//! Three strategies are provided, all deterministic and order-dependent:
//!
//! - [`BlockGrouper`]: consecutive blocks of `replicates` rows.
//! - [`PrefixPartitioner`]: rows split by well-identifier prefix into
//!   conditions, each then block-grouped on its own.
//! - [`WashGrouper`]: rows of one plate row grouped by plate column,
//!   `(column - 1) / replicates`.
//!
//! A row count that is not a multiple of the replicate count leaves a short
//! final group. It is kept and a warning is logged.

use std::collections::BTreeMap;
use std::ops::Range;

use indexmap::IndexMap;
use itertools::Itertools;
use log::{
    debug,
    warn,
};

use crate::data_structs::{
    ConditionMeta,
    LabeledGroup,
    SampleTable,
};
use crate::error::{
    CytoError,
    Result,
};
use crate::utils::{
    char_prefix,
    trailing_number,
};

pub const DEFAULT_REPLICATES: usize = 3;
pub const DEFAULT_PREFIX_LEN: usize = 2;

/// Consecutive fixed-size blocks: row `i` belongs to group `i / replicates`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGrouper {
    replicates: usize,
}

impl Default for BlockGrouper {
    fn default() -> Self {
        Self {
            replicates: DEFAULT_REPLICATES,
        }
    }
}

impl BlockGrouper {
    pub fn new(replicates: usize) -> Result<Self> {
        if replicates == 0 {
            return Err(CytoError::config("replicate count must be positive"));
        }
        Ok(Self { replicates })
    }

    pub fn replicates(&self) -> usize {
        self.replicates
    }

    /// Group index of a row position.
    pub fn group_of(
        &self,
        position: usize,
    ) -> usize {
        position / self.replicates
    }

    /// Row ranges of each group for a subset of `n_rows` rows.
    ///
    /// Yields `ceil(n_rows / replicates)` non-empty ranges.
    pub fn ranges(
        &self,
        n_rows: usize,
    ) -> Vec<Range<usize>> {
        (0..n_rows)
            .step_by(self.replicates)
            .map(|start| start..(start + self.replicates).min(n_rows))
            .collect()
    }

    /// Cuts `table` into groups and labels group `i` with `labels[i]`.
    ///
    /// `context` names the subset in errors and diagnostics.
    pub fn group(
        &self,
        table: &SampleTable,
        labels: &[String],
        context: &str,
    ) -> Result<Vec<LabeledGroup>> {
        let ranges = self.ranges(table.len());
        check_labels(ranges.len(), labels, context)?;
        if let Some(last) = ranges.last() {
            if last.len() < self.replicates {
                warn!(
                    "{context}: last group '{}' has {} of {} replicates",
                    labels[ranges.len() - 1],
                    last.len(),
                    self.replicates
                );
            }
        }
        debug!("{context}: {} rows in {} groups", table.len(), ranges.len());

        Ok(ranges
            .into_iter()
            .enumerate()
            .map(|(index, range)| {
                LabeledGroup::new(
                    index,
                    labels[index].clone(),
                    table.slice(range.start, range.len()),
                )
            })
            .collect())
    }
}

fn check_labels(
    n_groups: usize,
    labels: &[String],
    context: &str,
) -> Result<()> {
    if n_groups > labels.len() {
        return Err(CytoError::LabelMismatch {
            groups:  n_groups,
            labels:  labels.len(),
            context: context.to_string(),
        });
    }
    Ok(())
}

/// Rows of one condition, selected by well prefix.
#[derive(Debug, Clone)]
pub struct ConditionPartition {
    pub prefix: String,
    pub meta:   ConditionMeta,
    pub table:  SampleTable,
}

impl ConditionPartition {
    /// Block-groups this partition independently of the others.
    pub fn group(
        &self,
        grouper: &BlockGrouper,
        labels: &[String],
    ) -> Result<Vec<LabeledGroup>> {
        grouper.group(&self.table, labels, &format!("prefix {}", self.prefix))
    }
}

/// Splits rows by the first `prefix_len` characters of the well identifier.
#[derive(Debug, Clone)]
pub struct PrefixPartitioner {
    prefix_len: usize,
    conditions: IndexMap<String, ConditionMeta>,
}

impl PrefixPartitioner {
    pub fn new(
        prefix_len: usize,
        conditions: IndexMap<String, ConditionMeta>,
    ) -> Result<Self> {
        if prefix_len == 0 {
            return Err(CytoError::config("prefix length must be positive"));
        }
        Ok(Self {
            prefix_len,
            conditions,
        })
    }

    pub fn conditions(&self) -> &IndexMap<String, ConditionMeta> {
        &self.conditions
    }

    /// One partition per mapping entry, in mapping order.
    ///
    /// Rows matching no prefix are dropped. A prefix matching no rows gives
    /// an empty partition.
    pub fn partition(
        &self,
        table: &SampleTable,
    ) -> Result<Vec<ConditionPartition>> {
        let prefixes = table
            .wells()?
            .iter()
            .map(|w| char_prefix(w, self.prefix_len).to_string())
            .collect_vec();
        let unmatched = prefixes
            .iter()
            .filter(|p| !self.conditions.contains_key(p.as_str()))
            .count();
        if unmatched > 0 {
            debug!("{unmatched} rows match no condition prefix");
        }

        self.conditions
            .iter()
            .map(|(prefix, meta)| {
                let rows = prefixes
                    .iter()
                    .positions(|p| p == prefix)
                    .collect_vec();
                Ok(ConditionPartition {
                    prefix: prefix.clone(),
                    meta:   meta.clone(),
                    table:  table.take_rows(&rows)?,
                })
            })
            .collect()
    }
}

/// Groups one plate row by column: wash `k` holds columns
/// `k * replicates + 1 ..= (k + 1) * replicates`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WashGrouper {
    block: BlockGrouper,
}

impl WashGrouper {
    pub fn new(replicates: usize) -> Result<Self> {
        Ok(Self {
            block: BlockGrouper::new(replicates)?,
        })
    }

    /// Groups the rows whose well starts with `plate_row`, labelled by wash
    /// index and ordered by it.
    pub fn group(
        &self,
        table: &SampleTable,
        plate_row: char,
    ) -> Result<Vec<LabeledGroup>> {
        let subset = table.filter_wells(|w| w.starts_with(plate_row))?;
        let mut washes: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (row, well) in subset.wells()?.iter().enumerate() {
            let column = trailing_number(well)
                .filter(|&c| c > 0)
                .ok_or_else(|| {
                    CytoError::data_format(format!(
                        "well '{well}' has no plate column number"
                    ))
                })?;
            washes
                .entry(self.block.group_of(column - 1))
                .or_default()
                .push(row);
        }
        debug!("plate row {plate_row}: {} wash groups", washes.len());

        washes
            .into_iter()
            .map(|(wash, rows)| {
                if rows.len() != self.block.replicates() {
                    warn!(
                        "plate row {plate_row}: wash {wash} has {} of {} replicates",
                        rows.len(),
                        self.block.replicates()
                    );
                }
                Ok(LabeledGroup::new(
                    wash,
                    wash.to_string(),
                    subset.take_rows(&rows)?,
                ))
            })
            .collect()
    }
}

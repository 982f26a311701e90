use serde::Serialize;

use super::condition::ConditionMeta;
use super::table::SampleTable;
use crate::error::Result;

/// A replicate group: consecutive wells sharing one construct label.
///
/// Never empty.
#[derive(Debug, Clone)]
pub struct LabeledGroup {
    pub(crate) index: usize,
    pub(crate) label: String,
    pub(crate) table: SampleTable,
}

impl LabeledGroup {
    pub(crate) fn new(
        index: usize,
        label: impl Into<String>,
        table: SampleTable,
    ) -> Self {
        debug_assert!(!table.is_empty(), "replicate groups are never empty");
        Self {
            index,
            label: label.into(),
            table,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn table(&self) -> &SampleTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn wells(&self) -> Result<Vec<String>> {
        self.table.wells()
    }

    pub fn values(
        &self,
        column: &str,
    ) -> Result<Vec<f64>> {
        self.table.values(column)
    }
}

/// Mean and sample standard deviation of one column over one group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub index:     usize,
    pub label:     String,
    pub n:         usize,
    pub mean:      f64,
    /// NaN for single-well groups.
    pub std:       f64,
    pub values:    Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionMeta>,
}

/// Treated-minus-baseline difference of two positionally paired summaries.
#[derive(Debug, Clone, Serialize)]
pub struct Difference {
    pub index:           usize,
    pub label:           String,
    pub mean_diff:       f64,
    pub std_combined:    f64,
    /// Per-replicate `b_i - a_i`, used for the point overlay.
    pub replicate_diffs: Vec<f64>,
}

//! Core data structures of the crate.
//!
//! - [`SampleTable`]: the loaded export table, a thin wrapper over a
//!   `polars::DataFrame` with a string `Well` column first.
//! - [`LabeledGroup`]: one replicate group cut from a table.
//! - [`GroupSummary`] and [`Difference`]: immutable aggregation results handed
//!   to the renderer.
//! - [`ConditionMeta`] and [`HexColor`]: condition naming and display colors.

mod condition;
mod summary;
mod table;

pub use condition::{
    ConditionMeta,
    HexColor,
};
pub use summary::{
    Difference,
    GroupSummary,
    LabeledGroup,
};
pub use table::{
    SampleTable,
    WELL_COL,
};

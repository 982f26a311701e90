//! Analysis stages between a loaded [`SampleTable`](crate::data_structs::SampleTable)
//! and a chart.
//!
//! - [`grouping`]: block, prefix and wash grouping of table rows.
//! - [`aggregate`]: per-group mean and standard deviation, paired
//!   differences.
//! - [`regression`]: least-squares fit of one channel against another.
//! - [`experiment`]: a configured run tying the stages together.
pub mod aggregate;
pub mod experiment;
pub mod grouping;
pub mod regression;

//! # cytobar
//!
//! `cytobar` turns flow-cytometry export tables (FlowJo-style CSV files) into
//! replicate-group statistics and comparison charts. Rows are grouped into
//! replicate groups, each group is summarised by its mean and sample
//! standard deviation, and the result is drawn as a bar chart with error
//! bars and jittered replicate points, saved as SVG and PNG.
//!
//! If you do not want to use cytobar as a crate, the `cytobar` command-line
//! tool from the `cytobar-cli` package wraps the same pipeline.
//!
//! ## Structure
//!
//! * [`data_structs`]: the loaded table ([`SampleTable`]), replicate groups
//!   and the summary records handed to the renderer.
//! * [`io`]: CSV loading ([`TableReaderBuilder`]) and TOML experiment
//!   configuration ([`ExperimentConfig`]).
//! * [`tools`]: grouping, aggregation, regression and the [`Experiment`]
//!   runner.
//! * [`plots`]: bar charts and regression grids on top of `plotters`.
//! * [`utils`]: helpers for well identifiers and column names.
//!
//! ## Usage
//!
//! ### Summarising replicate groups
//!
//! ```no_run
//! use cytobar::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let table = TableReaderBuilder::default().read_path("table.csv")?;
//!     let labels = vec!["ICR58".to_string(), "ICR66".to_string()];
//!     let groups = BlockGrouper::default().group(&table, &labels, "table")?;
//!     for summary in summarize(&groups, "Geometric Mean", None)? {
//!         println!("{}: {} ± {}", summary.label, summary.mean, summary.std);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Running a configured experiment
//!
//! ```no_run
//! use cytobar::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let report = Experiment::from_path("experiment.toml")?
//!         .with_seed(Some(7))
//!         .run()?;
//!     for path in report.written {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```

pub mod data_structs;
pub mod error;
pub mod io;
pub mod plots;
pub mod prelude;
pub mod tools;
pub mod utils;

#[allow(unused_imports)]
use prelude::*;

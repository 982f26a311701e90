pub use crate::data_structs::{
    ConditionMeta,
    Difference,
    GroupSummary,
    HexColor,
    LabeledGroup,
    SampleTable,
    WELL_COL,
};
pub use crate::error::{
    CytoError,
    Result,
};
pub use crate::io::{
    AnalysisConfig,
    ExperimentConfig,
    LoaderConfig,
    TableReaderBuilder,
    WashSeriesConfig,
};
pub use crate::plots::{
    Bar,
    BarChart,
    BarSeries,
    Figure,
    ImageFormat,
    OutputTarget,
    PlotStyle,
    RegressionGrid,
    RegressionPanel,
    PANEL_GRID_HEIGHT_IN,
};
pub use crate::tools::aggregate::{
    describe,
    finite_count,
    paired_difference,
    summarize,
};
pub use crate::tools::experiment::{
    Experiment,
    RunReport,
    SummaryRow,
};
pub use crate::tools::grouping::{
    BlockGrouper,
    PrefixPartitioner,
    WashGrouper,
};
pub use crate::tools::regression::{
    linear_regression,
    LinearFit,
};

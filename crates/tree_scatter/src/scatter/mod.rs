//! Tree scatter pipeline: settings, the weighted sampler, placement records and events.
pub mod events;
pub mod placement;
pub mod runner;
pub mod settings;

pub use placement::TreePlacement;
pub use runner::{scatter_trees, scatter_trees_with_events, RunResult, RunStatus, TreeScatterer};
pub use settings::{BudgetLimit, SamplingBudget, ScaleRange, ScatterSettings};

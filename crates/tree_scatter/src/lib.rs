#![forbid(unsafe_code)]
//! tree_scatter: scatter trees over a terrain by the weight of one alphamap layer.
//!
//! Modules:
//! - alphamap: weight grids, multi-layer alphamaps, bilinear sampling
//! - curve: probability curves (keyframe curves and closures)
//! - sampling: uniform random draws shared by the sampler
//! - scatter: settings and budgets, the weighted tree sampler, placements, events
//! - terrain: adapter trait for host terrains and the place-trees-by-texture operation
pub mod alphamap;
pub mod curve;
pub mod error;
pub mod sampling;
pub mod scatter;
pub mod terrain;

/// Convenient re-exports for common types. Import with `use tree_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::alphamap::{sample_bilinear, Alphamap, AlphamapLayer, WeightField, WeightGrid};
    pub use crate::curve::{Curve, Keyframe, ProbabilityCurve};
    pub use crate::error::{Error, Result};
    pub use crate::scatter::events::{
        EventSink, FnSink, MultiSink, ScatterEvent, ScatterEventKind, VecSink,
    };
    pub use crate::scatter::placement::{TreePlacement, WHITE};
    pub use crate::scatter::runner::{
        scatter_trees, scatter_trees_with_events, RunResult, RunStatus, TreeScatterer,
    };
    pub use crate::scatter::settings::{BudgetLimit, SamplingBudget, ScaleRange, ScatterSettings};
    pub use crate::terrain::{
        place_trees_by_texture, place_trees_by_texture_with_events, TerrainSnapshot,
        TreePrototype, TreeTerrain,
    };
}

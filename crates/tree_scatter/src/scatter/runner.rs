//! Weighted tree sampler: rejection sampling of a weight layer against a probability curve.
use std::f32::consts::TAU;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::alphamap::{sample_bilinear, WeightField};
use crate::curve::ProbabilityCurve;
use crate::error::{Error, Result};
use crate::sampling::{rand01, rand_index, rand_range, rand_range_inclusive, uniform_grid_point};
use crate::scatter::events::{EventSink, ScatterEvent, ScatterEventKind};
use crate::scatter::placement::TreePlacement;
use crate::scatter::settings::{BudgetLimit, ScatterSettings, DEADLINE_CHECK_INTERVAL};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// All requested trees were placed.
    Completed,
    /// The sampling budget ran out first; placements hold a partial result.
    BudgetExhausted { limit: BudgetLimit },
    /// The weight grid had no cells; nothing was sampled.
    EmptyGrid,
}

/// Result of a scatter run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Placements in acceptance order.
    pub placements: Vec<TreePlacement>,
    /// Number of trees requested.
    pub target_count: usize,
    /// Total candidates drawn.
    pub attempts: u64,
    /// Candidates rejected by the curve.
    pub rejected: u64,
    pub status: RunStatus,
}

impl Default for RunResult {
    fn default() -> Self {
        Self::new()
    }
}

impl RunResult {
    /// Creates a new empty, completed [`RunResult`].
    pub fn new() -> Self {
        Self {
            placements: Vec::new(),
            target_count: 0,
            attempts: 0,
            rejected: 0,
            status: RunStatus::Completed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Fraction of candidates that became trees, or 0 if nothing was drawn.
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.placements.len() as f64 / self.attempts as f64
    }

    /// Returns the placements if the run completed, otherwise an error describing why not.
    pub fn into_complete(self) -> Result<Vec<TreePlacement>> {
        match self.status {
            RunStatus::Completed => Ok(self.placements),
            RunStatus::BudgetExhausted { .. } => Err(Error::BudgetExceeded {
                placed: self.placements.len(),
                target: self.target_count,
                attempts: self.attempts,
            }),
            RunStatus::EmptyGrid => Err(Error::EmptyGrid),
        }
    }
}

/// Runner holding validated settings, reusable across grids and curves.
pub struct TreeScatterer {
    /// Settings applied to every run.
    pub settings: ScatterSettings,
}

impl TreeScatterer {
    pub fn try_new(settings: ScatterSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn new(settings: ScatterSettings) -> Self {
        debug_assert!(
            settings.prototype_count > 0,
            "prototype_count must be > 0"
        );
        debug_assert!(
            settings.height_range.min <= settings.height_range.max,
            "height_range.min must be <= height_range.max"
        );
        Self { settings }
    }

    /// Scatters trees over `grid`, returning the result.
    pub fn run<F, C>(&mut self, grid: &F, curve: &C, rng: &mut impl Rng) -> RunResult
    where
        F: WeightField + ?Sized,
        C: ProbabilityCurve + ?Sized,
    {
        scatter_trees(grid, curve, &self.settings, rng)
    }

    pub fn run_with_events<F, C>(
        &mut self,
        grid: &F,
        curve: &C,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> RunResult
    where
        F: WeightField + ?Sized,
        C: ProbabilityCurve + ?Sized,
    {
        scatter_trees_with_events(grid, curve, &self.settings, rng, sink)
    }
}

pub fn scatter_trees<F, C, R>(
    grid: &F,
    curve: &C,
    settings: &ScatterSettings,
    rng: &mut R,
) -> RunResult
where
    F: WeightField + ?Sized,
    C: ProbabilityCurve + ?Sized,
    R: Rng,
{
    scatter_trees_with_events(grid, curve, settings, rng, &mut ())
}

/// Draws candidates until `settings.target_count` trees are accepted or the budget runs out.
///
/// Each attempt draws a continuous grid coordinate in `[0, W-1) x [0, H-1)`, samples the
/// layer bilinearly, and accepts with probability `curve(weight)`. Accepted trees then draw
/// height scale, prototype index, rotation and (when unlocked) width scale, in that order.
pub fn scatter_trees_with_events<F, C, R>(
    grid: &F,
    curve: &C,
    settings: &ScatterSettings,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> RunResult
where
    F: WeightField + ?Sized,
    C: ProbabilityCurve + ?Sized,
    R: Rng,
{
    let grid_size = grid.size();
    let (w, h) = grid_size;
    let target = settings.target_count;

    if sink.wants(ScatterEventKind::RunStarted) {
        sink.send(ScatterEvent::RunStarted {
            settings: settings.clone(),
            grid_size,
        });
    }

    if grid.is_empty() {
        warn!("Weight grid is empty ({}x{}); skipping.", w, h);
        if sink.wants(ScatterEventKind::Warning) {
            sink.send(ScatterEvent::Warning {
                context: "grid".into(),
                message: format!("Weight grid is empty ({w}x{h}); skipping"),
            });
        }
        let result = RunResult {
            target_count: target,
            status: RunStatus::EmptyGrid,
            ..RunResult::new()
        };
        if sink.wants(ScatterEventKind::RunFinished) {
            sink.send(ScatterEvent::RunFinished {
                result: result.clone(),
            });
        }
        return result;
    }

    debug!(
        "Scattering {} trees over {}x{} grid (budget: {:?}).",
        target, w, h, settings.budget
    );

    let budget = settings.budget;
    let started = budget.max_duration.map(|_| Instant::now());
    let height_range = settings.height_range;
    let width_range = settings.width_range;

    let mut placements: Vec<TreePlacement> = Vec::with_capacity(target);
    let mut attempts: u64 = 0;
    let mut rejected: u64 = 0;
    let mut exhausted: Option<BudgetLimit> = None;

    while placements.len() < target {
        if budget.max_attempts.is_some_and(|max| attempts >= max) {
            exhausted = Some(BudgetLimit::Attempts);
            break;
        }
        if let (Some(max), Some(started)) = (budget.max_duration, started) {
            if attempts % DEADLINE_CHECK_INTERVAL == 0 && started.elapsed() >= max {
                exhausted = Some(BudgetLimit::Duration);
                break;
            }
        }
        attempts += 1;

        let point = uniform_grid_point(rng, w, h);
        let weight = sample_bilinear(grid, point.x, point.y);
        let probability = curve.evaluate(weight);
        let roll = rand01(rng);
        // A non-positive or NaN probability never accepts, even on a zero roll.
        let accepted = probability > 0.0 && roll <= probability;

        if sink.wants(ScatterEventKind::CandidateEvaluated) {
            sink.send(ScatterEvent::CandidateEvaluated {
                attempt: attempts,
                grid_position: point,
                weight,
                probability,
                accepted,
            });
        }

        if !accepted {
            rejected += 1;
            continue;
        }

        let height_scale = rand_range_inclusive(rng, height_range.min, height_range.max);
        let prototype_index = rand_index(rng, settings.prototype_count);
        let rotation = rand_range(rng, 0.0, TAU);
        let width_scale = if settings.lock_width_to_height {
            height_scale
        } else {
            rand_range_inclusive(rng, width_range.min, width_range.max)
        };

        let placement = TreePlacement::from_grid_point(
            point.x,
            point.y,
            grid_size,
            rotation,
            height_scale,
            width_scale,
            prototype_index,
        );
        if sink.wants(ScatterEventKind::PlacementMade) {
            sink.send(ScatterEvent::PlacementMade {
                index: placements.len(),
                placement: placement.clone(),
            });
        }
        placements.push(placement);
    }

    let status = match exhausted {
        Some(limit) => {
            warn!(
                "Sampling budget exhausted ({:?}): placed {} of {} trees in {} attempts.",
                limit,
                placements.len(),
                target,
                attempts
            );
            if sink.wants(ScatterEventKind::BudgetExhausted) {
                sink.send(ScatterEvent::BudgetExhausted {
                    limit,
                    placed: placements.len(),
                    attempts,
                });
            }
            RunStatus::BudgetExhausted { limit }
        }
        None => {
            info!("Placed {} trees in {} attempts.", placements.len(), attempts);
            RunStatus::Completed
        }
    };

    let result = RunResult {
        placements,
        target_count: target,
        attempts,
        rejected,
        status,
    };

    if sink.wants(ScatterEventKind::RunFinished) {
        sink.send(ScatterEvent::RunFinished {
            result: result.clone(),
        });
    }

    result
}

//! Three-stage fleet sizing.
//!
//! 1. For every truck type alone, bound the number of trucks needed with
//!    [`upper_bound_slots`] and solve with that many trucks of that type.
//!    The number of trucks the solver actually uses becomes that type's count.
//! 2. Solve once more with all types together, each at the count found in
//!    step 1. The single-type packings together are feasible for this fleet,
//!    so it is never infeasible when step 1 succeeded.
//!
//! Phases run strictly one after another; the only state carried forward is
//! the per-type truck counts.

use crate::assertions;
use crate::error::{InfeasibilityCause, LoadingError};
use crate::extract::Packing;
use crate::fleet::{Fleet, upper_bound_slots};
use crate::items::ItemSet;
use crate::model::LoadingModel;
use crate::solver::{MilpSolver, RawSolution, SolveOutcome, SolveParams, SolveStatus};
use log::{info, warn};
use serde::Serialize;
use std::fmt::{self, Display};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Only trucks of the given (0-based) type.
    SingleType(usize),
    /// All types together.
    Combined,
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleType(t) => write!(f, "trucks of type {} only", t + 1),
            Self::Combined => write!(f, "trucks of all types"),
        }
    }
}

/// What one phase was fed and what it achieved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    /// Trucks per type made available to the solver.
    pub available: Vec<usize>,
    /// Trucks per type the solver actually used.
    pub used: Vec<usize>,
    pub objective: f64,
    pub gap: f64,
    pub status: SolveStatus,
    pub wall_time: Duration,
}

/// The final packing plus the trail of phases that led to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadingPlan {
    pub capacities: Vec<f64>,
    pub phases: Vec<PhaseSummary>,
    pub packing: Packing,
}

impl LoadingPlan {
    /// True when every phase closed its gap. Otherwise the per-type counts fed
    /// into the combined phase may be larger than necessary.
    pub fn is_proven(&self) -> bool {
        self.phases.iter().all(|p| p.status.is_proven())
    }

    /// Largest achieved gap over all phases.
    pub fn worst_gap(&self) -> f64 {
        self.phases.iter().map(|p| p.gap).fold(0.0, f64::max)
    }
}

pub struct PhaseController {
    capacities: Vec<f64>,
    params: SolveParams,
}

impl PhaseController {
    /// `capacities` holds one entry per truck type.
    pub fn new(capacities: Vec<f64>, params: SolveParams) -> Self {
        Self { capacities, params }
    }

    /// Runs all phases. The first infeasible or failed phase aborts the run.
    pub fn run<S: MilpSolver>(
        &self,
        solver: &mut S,
        items: &ItemSet,
    ) -> Result<LoadingPlan, LoadingError> {
        let n_types = self.capacities.len();
        let mut phases = Vec::with_capacity(n_types + 1);
        let mut min_counts = Vec::with_capacity(n_types);

        for (t, &capacity) in self.capacities.iter().enumerate() {
            let phase = Phase::SingleType(t);
            let bound = upper_bound_slots(items, capacity).ok_or_else(|| {
                let item = items.first_heavier_than(capacity).unwrap_or(0);
                LoadingError::Infeasible {
                    phase,
                    cause: InfeasibilityCause::ItemExceedsCapacity {
                        item: item + 1,
                        weight: items.weight(item),
                        max_capacity: capacity,
                    },
                }
            })?;
            let fleet = Fleet::single_type(&self.capacities, t, bound);
            let (model, solution) = self.solve_phase(solver, items, &fleet, phase)?;
            let summary = self.summarize(phase, &fleet, &model, &solution);
            min_counts.push(summary.used[t]);
            phases.push(summary);
        }

        let phase = Phase::Combined;
        let fleet = Fleet::with_counts(&self.capacities, &min_counts);
        let (model, solution) = self.solve_phase(solver, items, &fleet, phase)?;
        let summary = self.summarize(phase, &fleet, &model, &solution);
        debug_assert!(
            summary
                .used
                .iter()
                .zip(&min_counts)
                .all(|(used, available)| used <= available)
        );
        phases.push(summary);

        let packing = Packing::extract(&model, items, &solution);
        debug_assert!(
            assertions::packing_is_partition(&packing, items)
                && assertions::packing_respects_capacity(&packing)
        );

        info!(
            "[PHASE] done: {} trucks {:?}, committed capacity {}, specific load {:.4}",
            packing.trucks.len(),
            packing.used_per_type(n_types),
            packing.objective,
            packing.specific_load
        );

        Ok(LoadingPlan {
            capacities: self.capacities.clone(),
            phases,
            packing,
        })
    }

    fn solve_phase<S: MilpSolver>(
        &self,
        solver: &mut S,
        items: &ItemSet,
        fleet: &Fleet,
        phase: Phase,
    ) -> Result<(LoadingModel, RawSolution), LoadingError> {
        info!(
            "[PHASE] {}: {} rolls, trucks available {:?}",
            phase,
            items.len(),
            fleet.counts()
        );
        let model = LoadingModel::build(format!("Model with {phase}"), items, fleet)
            .map_err(|cause| LoadingError::Infeasible { phase, cause })?;

        match solver.solve(model.program(), &self.params) {
            Ok(SolveOutcome::Solved(solution)) => Ok((model, solution)),
            Ok(SolveOutcome::Infeasible) => Err(LoadingError::Infeasible {
                phase,
                cause: InfeasibilityCause::ProvenBySolver,
            }),
            Err(error) => Err(LoadingError::Solver { phase, error }),
        }
    }

    fn summarize(
        &self,
        phase: Phase,
        fleet: &Fleet,
        model: &LoadingModel,
        solution: &RawSolution,
    ) -> PhaseSummary {
        let used = model.used_per_type(&solution.values, self.capacities.len());
        info!(
            "[PHASE] {}: trucks used {:?}, objective {}, gap {:.4}, {:?}",
            phase, used, solution.objective, solution.gap, solution.status
        );
        if !solution.status.is_proven() {
            warn!(
                "[PHASE] {}: not proven optimal (gap {:.4}), truck counts passed on may be too high",
                phase, solution.gap
            );
        }
        PhaseSummary {
            phase,
            available: fleet.counts(),
            used,
            objective: solution.objective,
            gap: solution.gap,
            status: solution.status.clone(),
            wall_time: solution.wall_time,
        }
    }
}

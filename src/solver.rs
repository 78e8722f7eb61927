//! The MILP solving capability.
//!
//! [`MilpSolver`] is the seam between the loading logic and an actual
//! branch-and-bound engine. [`ScipSession`] is the SCIP-backed
//! implementation: the session is created explicitly by the caller and each
//! call to [`MilpSolver::solve`] builds a fresh SCIP instance that is dropped
//! when the call returns, so no solver state outlives a solve.

use crate::error::SolverError;
use crate::program::{BinaryProgram, Sense};
use log::{debug, warn};
use russcip::Retcode;
use russcip::prelude::*;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Tuning knobs of a solve. They bound latency; they never change the
/// problem being solved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolveParams {
    /// Relative optimality gap at which the search stops.
    pub gap: f64,
    pub time_limit: Duration,
    pub threads: usize,
}

impl Default for SolveParams {
    fn default() -> Self {
        Self {
            gap: 0.001,
            time_limit: Duration::from_secs(150),
            threads: 10,
        }
    }
}

/// How a solve that produced a solution ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Stopped once the gap fell below the requested tolerance.
    WithinGap,
    /// Stopped on another limit (time, nodes, ...) with a feasible incumbent.
    LimitReached(String),
}

impl SolveStatus {
    /// True when the result is optimal up to the requested gap.
    pub fn is_proven(&self) -> bool {
        matches!(self, Self::Optimal | Self::WithinGap)
    }
}

/// Values of every variable, indexed like the program's variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawSolution {
    pub values: Vec<f64>,
    pub objective: f64,
    /// Achieved relative gap between incumbent and best bound.
    pub gap: f64,
    pub status: SolveStatus,
    pub wall_time: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Solved(RawSolution),
    Infeasible,
}

pub trait MilpSolver {
    fn solve(
        &mut self,
        program: &BinaryProgram,
        params: &SolveParams,
    ) -> Result<SolveOutcome, SolverError>;
}

/// Relative gap as SCIP defines it: `|primal - dual| / min(|primal|, |dual|)`,
/// zero when both agree and infinite when they differ in sign or one is zero.
pub fn relative_gap(primal: f64, dual: f64) -> f64 {
    if (primal - dual).abs() <= f64::EPSILON * primal.abs().max(1.0) {
        0.0
    } else if primal == 0.0 || dual == 0.0 || primal * dual < 0.0 {
        f64::INFINITY
    } else {
        (primal - dual).abs() / primal.abs().min(dual.abs())
    }
}

/// A solving session backed by SCIP.
#[derive(Debug, Default)]
pub struct ScipSession {
    show_output: bool,
    n_solves: usize,
}

impl ScipSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets SCIP print its own progress log.
    pub fn with_output(mut self, show_output: bool) -> Self {
        self.show_output = show_output;
        self
    }

    /// Number of solves run through this session.
    pub fn n_solves(&self) -> usize {
        self.n_solves
    }
}

fn param_error(name: &'static str) -> impl Fn(Retcode) -> SolverError {
    move |code| SolverError::Parameter {
        name,
        reason: format!("{code:?}"),
    }
}

/// SCIP takes the thread count as a C int.
fn lp_threads(threads: usize) -> Result<i32, SolverError> {
    i32::try_from(threads).map_err(|_| SolverError::Parameter {
        name: "lp/threads",
        reason: format!("{threads} threads do not fit the solver's integer range"),
    })
}

impl MilpSolver for ScipSession {
    fn solve(
        &mut self,
        program: &BinaryProgram,
        params: &SolveParams,
    ) -> Result<SolveOutcome, SolverError> {
        self.n_solves += 1;
        let start = Instant::now();

        let mut model = Model::new();
        if !self.show_output {
            model = model.hide_output();
        }
        let obj_sense = match program.sense() {
            Sense::Minimize => ObjSense::Minimize,
            Sense::Maximize => ObjSense::Maximize,
        };
        let mut model = model
            .include_default_plugins()
            .create_prob(program.name())
            .set_obj_sense(obj_sense)
            .set_real_param("limits/gap", params.gap)
            .map_err(param_error("limits/gap"))?
            .set_real_param("limits/time", params.time_limit.as_secs_f64())
            .map_err(param_error("limits/time"))?
            .set_int_param("lp/threads", lp_threads(params.threads)?)
            .map_err(param_error("lp/threads"))?;

        let vars: Vec<_> = program
            .vars()
            .iter()
            .map(|v| model.add_var(0., 1., v.obj, &v.name, VarType::Binary))
            .collect();

        for cons in program.constraints() {
            let cons_vars = cons.terms.iter().map(|(id, _)| &vars[id.get()]).collect();
            let coefs: Vec<f64> = cons.terms.iter().map(|(_, coef)| *coef).collect();
            model.add_cons(cons_vars, &coefs, cons.lhs, cons.rhs, &cons.name);
        }

        let solved_model = model.solve();
        let scip_status = solved_model.status();
        debug!(
            "[SCIP] {} finished with status {:?} after {:?}",
            program.name(),
            scip_status,
            start.elapsed()
        );

        if scip_status == Status::Infeasible {
            return Ok(SolveOutcome::Infeasible);
        }

        let Some(sol) = solved_model.best_sol() else {
            return Err(SolverError::NoSolution {
                status: format!("{scip_status:?}"),
            });
        };

        let status = match scip_status {
            Status::Optimal => SolveStatus::Optimal,
            Status::GapLimit => SolveStatus::WithinGap,
            Status::Unbounded => {
                return Err(SolverError::UnexpectedStatus(format!("{scip_status:?}")));
            }
            other => {
                warn!(
                    "[SCIP] {} stopped on {:?} before closing the gap",
                    program.name(),
                    other
                );
                SolveStatus::LimitReached(format!("{other:?}"))
            }
        };

        let values = vars.iter().map(|v| sol.val(v)).collect();
        let objective = sol.obj_val();
        let gap = match status {
            SolveStatus::Optimal => 0.0,
            _ => relative_gap(objective, solved_model.best_bound()),
        };

        Ok(SolveOutcome::Solved(RawSolution {
            values,
            objective,
            gap,
            status,
            wall_time: start.elapsed(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn gap_matches_scip_definition() {
        assert_eq!(relative_gap(20.0, 20.0), 0.0);
        assert!(approx_eq!(f64, relative_gap(30.0, 20.0), 0.5, epsilon = 1e-12));
        assert!(approx_eq!(f64, relative_gap(20.0, 30.0), 0.5, epsilon = 1e-12));
        assert_eq!(relative_gap(10.0, 0.0), f64::INFINITY);
        assert_eq!(relative_gap(10.0, -1.0), f64::INFINITY);
    }

    #[test]
    fn thread_count_must_fit_solver_int() {
        assert_eq!(lp_threads(10), Ok(10));
        assert!(matches!(
            lp_threads(usize::MAX),
            Err(SolverError::Parameter {
                name: "lp/threads",
                ..
            })
        ));
    }

    #[test]
    fn proven_statuses() {
        assert!(SolveStatus::Optimal.is_proven());
        assert!(SolveStatus::WithinGap.is_proven());
        assert!(!SolveStatus::LimitReached("TimeLimit".into()).is_proven());
    }
}

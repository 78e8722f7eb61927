//! Error types of the loading pipeline.
//!
//! Every failure names the phase it happened in, so a caller can tell an
//! infeasible single-type fleet apart from a failure of the combined solve.

use crate::phase::Phase;
use std::fmt::{self, Display};

/// Problems with the item weights, detected before any model is built.
#[derive(Debug)]
pub enum InputError {
    /// The item source yielded no weights.
    Empty,
    /// A weight was zero, negative or not finite. `index` is 1-based.
    NonPositiveWeight { index: usize, weight: f64 },
    /// A token could not be read as a weight. `line` is 1-based; for inline
    /// entries it is the entry number.
    Parse { line: usize, token: String },
    /// A header row was present but the requested column was not.
    MissingColumn(String),
    /// The underlying reader failed.
    Io(std::io::Error),
}

impl Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "item source yielded no weights"),
            Self::NonPositiveWeight { index, weight } => {
                write!(f, "item {index} has non-positive weight {weight}")
            }
            Self::Parse { line, token } => {
                write!(f, "could not parse '{token}' as a weight (line {line})")
            }
            Self::MissingColumn(name) => write!(f, "column '{name}' not found in header"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InputError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Why a model has no feasible assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum InfeasibilityCause {
    /// No slot of the fleet can ever hold this item. `item` is 1-based.
    ItemExceedsCapacity {
        item: usize,
        weight: f64,
        max_capacity: f64,
    },
    /// The fleet's combined capacity is below the total item weight.
    InsufficientCapacity { total_weight: f64, total_capacity: f64 },
    /// The fleet has no slots at all.
    NoSlots,
    /// The solver proved the model infeasible.
    ProvenBySolver,
}

impl InfeasibilityCause {
    /// The constraint class the infeasibility shows up in.
    pub fn constraint_class(&self) -> &'static str {
        match self {
            Self::ItemExceedsCapacity { .. } | Self::InsufficientCapacity { .. } => {
                "capacity coupling"
            }
            Self::NoSlots => "assignment",
            Self::ProvenBySolver => "assignment and capacity coupling",
        }
    }
}

impl Display for InfeasibilityCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemExceedsCapacity {
                item,
                weight,
                max_capacity,
            } => write!(
                f,
                "item {item} weighs {weight}, more than the largest available capacity {max_capacity}"
            ),
            Self::InsufficientCapacity {
                total_weight,
                total_capacity,
            } => write!(
                f,
                "total weight {total_weight} exceeds total fleet capacity {total_capacity}"
            ),
            Self::NoSlots => write!(f, "fleet has no trucks"),
            Self::ProvenBySolver => write!(f, "solver proved the model infeasible"),
        }
    }
}

/// Failures of the solving backend itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The backend rejected a parameter.
    Parameter { name: &'static str, reason: String },
    /// The solve stopped without any feasible solution and without proving
    /// infeasibility (e.g. the time limit hit before the first incumbent).
    NoSolution { status: String },
    /// The backend reported a status this crate cannot interpret.
    UnexpectedStatus(String),
}

impl Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter { name, reason } => {
                write!(f, "solver rejected parameter {name}: {reason}")
            }
            Self::NoSolution { status } => {
                write!(f, "solver stopped without a solution (status: {status})")
            }
            Self::UnexpectedStatus(status) => write!(f, "unexpected solver status: {status}"),
        }
    }
}

impl std::error::Error for SolverError {}

/// The error type of the loading pipeline.
#[derive(Debug)]
pub enum LoadingError {
    Input(InputError),
    Infeasible { phase: Phase, cause: InfeasibilityCause },
    Solver { phase: Phase, error: SolverError },
}

impl LoadingError {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible { .. })
    }

    /// The phase the error occurred in, if it got past input validation.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Input(_) => None,
            Self::Infeasible { phase, .. } | Self::Solver { phase, .. } => Some(*phase),
        }
    }
}

impl Display for LoadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "invalid input: {e}"),
            Self::Infeasible { phase, cause } => write!(
                f,
                "infeasible model ({phase}, {} constraints): {cause}",
                cause.constraint_class()
            ),
            Self::Solver { phase, error } => write!(f, "solver failure ({phase}): {error}"),
        }
    }
}

impl std::error::Error for LoadingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::Solver { error, .. } => Some(error),
            Self::Infeasible { .. } => None,
        }
    }
}

impl From<InputError> for LoadingError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

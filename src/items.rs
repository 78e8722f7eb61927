use crate::error::InputError;
use serde::Serialize;

/// Relative tolerance when comparing a load against a capacity. Matches the
/// feasibility tolerance of the solver, so decimal weights that fill a truck
/// exactly are not rejected over rounding noise.
pub const CAPACITY_TOLERANCE: f64 = 1e-6;

/// Whether `load` is over `capacity` by more than [`CAPACITY_TOLERANCE`].
#[inline]
pub fn exceeds_capacity(load: f64, capacity: f64) -> bool {
    load > capacity + CAPACITY_TOLERANCE * capacity.abs().max(1.0)
}

/// The rolls to be loaded, in input order.
///
/// Weights are checked once on construction and never change afterwards.
/// Items are addressed by their 0-based position; reports shift to 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSet {
    weights: Vec<f64>,
}

impl ItemSet {
    /// Fails on an empty sequence or on any weight that is not a positive
    /// finite number.
    pub fn new(weights: Vec<f64>) -> Result<Self, InputError> {
        if weights.is_empty() {
            return Err(InputError::Empty);
        }
        if let Some((i, &w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w > 0.0))
        {
            return Err(InputError::NonPositiveWeight {
                index: i + 1,
                weight: w,
            });
        }
        Ok(Self { weights })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, item: usize) -> f64 {
        self.weights[item]
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn max_weight(&self) -> f64 {
        self.weights.iter().copied().fold(f64::MIN, f64::max)
    }

    /// The first (0-based) item that does not fit into `capacity`, if any.
    pub fn first_heavier_than(&self, capacity: f64) -> Option<usize> {
        self.weights
            .iter()
            .position(|&w| exceeds_capacity(w, capacity))
    }
}

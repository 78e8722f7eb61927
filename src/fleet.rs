use crate::items::{CAPACITY_TOLERANCE, ItemSet};
use serde::Serialize;

/// A class of trucks sharing one capacity, with a pool of `count` trucks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TruckType {
    pub capacity: f64,
    pub count: usize,
}

/// One concrete truck drawn from a type's pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TruckSlot {
    /// Index of the [`TruckType`] this slot belongs to.
    pub type_index: usize,
    pub capacity: f64,
}

/// The candidate fleet fed into one solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fleet {
    types: Vec<TruckType>,
}

impl Fleet {
    pub fn new(types: Vec<TruckType>) -> Self {
        Self { types }
    }

    /// Builds a fleet from parallel slices of capacities and counts.
    ///
    /// # Panics
    ///
    /// Panics if `capacities` and `counts` differ in length.
    pub fn with_counts(capacities: &[f64], counts: &[usize]) -> Self {
        assert_eq!(
            capacities.len(),
            counts.len(),
            "capacities and counts must have the same length"
        );
        Self::new(
            capacities
                .iter()
                .zip(counts)
                .map(|(&capacity, &count)| TruckType { capacity, count })
                .collect(),
        )
    }

    /// A fleet with `count` trucks of type `type_index` and none of the others.
    pub fn single_type(capacities: &[f64], type_index: usize, count: usize) -> Self {
        let counts: Vec<usize> = (0..capacities.len())
            .map(|t| if t == type_index { count } else { 0 })
            .collect();
        Self::with_counts(capacities, &counts)
    }

    pub fn types(&self) -> &[TruckType] {
        &self.types
    }

    pub fn counts(&self) -> Vec<usize> {
        self.types.iter().map(|t| t.count).collect()
    }

    pub fn n_slots(&self) -> usize {
        self.types.iter().map(|t| t.count).sum()
    }

    pub fn total_capacity(&self) -> f64 {
        self.types
            .iter()
            .map(|t| t.capacity * t.count as f64)
            .sum()
    }

    /// Largest capacity among types that have at least one truck.
    pub fn max_available_capacity(&self) -> Option<f64> {
        self.types
            .iter()
            .filter(|t| t.count > 0)
            .map(|t| t.capacity)
            .reduce(f64::max)
    }

    /// Expands the pools into slots, type by type, in type order.
    pub fn slots(&self) -> Vec<TruckSlot> {
        self.types
            .iter()
            .enumerate()
            .flat_map(|(type_index, t)| {
                std::iter::repeat_n(
                    TruckSlot {
                        type_index,
                        capacity: t.capacity,
                    },
                    t.count,
                )
            })
            .collect()
    }
}

/// Number of trucks of a single `capacity` that always suffices for `items`:
/// `ceil(n / floor(capacity / max_weight))`.
///
/// Every truck takes at least `floor(capacity / max_weight)` items regardless
/// of which ones, so this many trucks can carry everything. Returns `None`
/// when the heaviest item does not fit at all.
pub fn upper_bound_slots(items: &ItemSet, capacity: f64) -> Option<usize> {
    let per_truck = (capacity / items.max_weight() + CAPACITY_TOLERANCE).floor() as usize;
    if per_truck == 0 {
        return None;
    }
    Some(items.len().div_ceil(per_truck))
}

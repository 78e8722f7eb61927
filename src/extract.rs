//! Turns solved variable values back into a concrete packing.

use crate::items::ItemSet;
use crate::model::{LoadingModel, is_set};
use crate::solver::{RawSolution, SolveStatus};
use serde::Serialize;

/// One truck that carries at least one roll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedTruck {
    /// 1-based running index over used trucks only.
    pub display_index: usize,
    /// Position of the slot in the model's slot order.
    pub slot_index: usize,
    pub type_index: usize,
    pub capacity: f64,
    /// 1-based item indices, ascending.
    pub items: Vec<usize>,
    pub weights: Vec<f64>,
}

impl LoadedTruck {
    pub fn load(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// A solved assignment of every roll to a truck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packing {
    /// Total item weight over total committed capacity.
    pub specific_load: f64,
    /// Total committed capacity as reported by the solver.
    pub objective: f64,
    pub gap: f64,
    pub status: SolveStatus,
    pub trucks: Vec<LoadedTruck>,
}

impl Packing {
    /// Reads the packing out of `solution`, which must come from solving
    /// `model.program()`.
    pub fn extract(model: &LoadingModel, items: &ItemSet, solution: &RawSolution) -> Self {
        let values = &solution.values;
        let mut trucks = Vec::new();

        for (s, slot) in model.slots().iter().enumerate() {
            if !is_set(values[model.used_var(s).get()]) {
                continue;
            }
            let (item_indices, weights): (Vec<usize>, Vec<f64>) = (0..model.n_items())
                .filter(|&i| is_set(values[model.assign_var(i, s).get()]))
                .map(|i| (i + 1, items.weight(i)))
                .unzip();
            if item_indices.is_empty() {
                continue;
            }
            trucks.push(LoadedTruck {
                display_index: trucks.len() + 1,
                slot_index: s,
                type_index: slot.type_index,
                capacity: slot.capacity,
                items: item_indices,
                weights,
            });
        }

        Self {
            specific_load: items.total_weight() / solution.objective,
            objective: solution.objective,
            gap: solution.gap,
            status: solution.status.clone(),
            trucks,
        }
    }

    /// Sum of capacities of the trucks in use.
    pub fn committed_capacity(&self) -> f64 {
        self.trucks.iter().map(|t| t.capacity).sum()
    }

    /// Number of used trucks per truck type.
    pub fn used_per_type(&self, n_types: usize) -> Vec<usize> {
        let mut counts = vec![0; n_types];
        for truck in &self.trucks {
            counts[truck.type_index] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::Fleet;
    use float_cmp::approx_eq;
    use std::time::Duration;

    fn solved(model: &LoadingModel, pairs: &[(usize, usize)], objective: f64) -> RawSolution {
        let mut values = vec![0.0; model.program().n_vars()];
        for &(item, slot) in pairs {
            // solver noise around the binary values
            values[model.assign_var(item, slot).get()] = 1.0 - 1e-9;
            values[model.used_var(slot).get()] = 1.0 + 1e-9;
        }
        RawSolution {
            values,
            objective,
            gap: 0.0,
            status: SolveStatus::Optimal,
            wall_time: Duration::ZERO,
        }
    }

    #[test]
    fn reports_used_trucks_in_slot_order() {
        let items = ItemSet::new(vec![10.0, 10.0, 10.0]).unwrap();
        let fleet = Fleet::with_counts(&[15.0, 20.0], &[3, 2]);
        let model = LoadingModel::build("both", &items, &fleet).unwrap();
        // item 0 on the second type-1 slot, items 1 and 2 on the last type-2 slot
        let solution = solved(&model, &[(0, 1), (1, 4), (2, 4)], 35.0);

        let packing = Packing::extract(&model, &items, &solution);

        assert_eq!(packing.trucks.len(), 2);
        let first = &packing.trucks[0];
        assert_eq!(first.display_index, 1);
        assert_eq!(first.slot_index, 1);
        assert_eq!(first.capacity, 15.0);
        assert_eq!(first.items, vec![1]);
        let second = &packing.trucks[1];
        assert_eq!(second.display_index, 2);
        assert_eq!(second.type_index, 1);
        assert_eq!(second.items, vec![2, 3]);
        assert_eq!(second.weights, vec![10.0, 10.0]);
        assert_eq!(second.load(), 20.0);

        assert_eq!(packing.used_per_type(2), vec![1, 1]);
        assert_eq!(packing.committed_capacity(), 35.0);
        assert!(approx_eq!(f64, packing.specific_load, 30.0 / 35.0, epsilon = 1e-12));
    }

    #[test]
    fn skips_used_slot_without_items() {
        let items = ItemSet::new(vec![5.0]).unwrap();
        let model =
            LoadingModel::build("t1", &items, &Fleet::with_counts(&[10.0], &[2])).unwrap();
        let mut solution = solved(&model, &[(0, 1)], 10.0);
        solution.values[model.used_var(0).get()] = 1.0;

        let packing = Packing::extract(&model, &items, &solution);

        assert_eq!(packing.trucks.len(), 1);
        assert_eq!(packing.trucks[0].slot_index, 1);
        assert_eq!(packing.trucks[0].display_index, 1);
        assert!(approx_eq!(f64, packing.specific_load, 0.5, epsilon = 1e-12));
    }
}

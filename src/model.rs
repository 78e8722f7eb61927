//! Binary program for loading rolls onto a candidate fleet.
//!
//! For items `i` and slots `s`:
//!
//! ```text
//! min  sum_s cap_s * y_s
//! s.t. sum_s x_is = 1                         for every item i
//!      sum_i w_i * x_is - cap_s * y_s <= 0    for every slot s
//!      x_is, y_s binary
//! ```
//!
//! The coupling row both bounds the load and forces `y_s = 1` as soon as
//! anything is put on slot `s`.

use crate::error::InfeasibilityCause;
use crate::fleet::{Fleet, TruckSlot};
use crate::items::{ItemSet, exceeds_capacity};
use crate::program::{BinaryProgram, ConstraintClass, Sense, VarId};
use log::debug;

/// Absolute tolerance for reading binary values back from the solver.
pub const BINARY_TOLERANCE: f64 = 1e-6;

/// Whether a solved binary value counts as set.
#[inline]
pub fn is_set(value: f64) -> bool {
    value.abs() > BINARY_TOLERANCE
}

/// The loading program together with the variable layout needed to read a
/// solution back.
#[derive(Debug, Clone)]
pub struct LoadingModel {
    program: BinaryProgram,
    slots: Vec<TruckSlot>,
    n_items: usize,
    /// `x` variables, row-major by item: `assign[item * n_slots + slot]`.
    assign: Vec<VarId>,
    /// `y` variables, one per slot.
    used: Vec<VarId>,
}

impl LoadingModel {
    /// Builds the program for `items` on `fleet`.
    ///
    /// Fails without building anything when the instance is trivially
    /// infeasible: an empty fleet, an item heavier than every available
    /// truck, or less total capacity than total weight.
    pub fn build(
        name: impl Into<String>,
        items: &ItemSet,
        fleet: &Fleet,
    ) -> Result<Self, InfeasibilityCause> {
        let Some(max_capacity) = fleet.max_available_capacity() else {
            return Err(InfeasibilityCause::NoSlots);
        };
        if let Some(item) = items.first_heavier_than(max_capacity) {
            return Err(InfeasibilityCause::ItemExceedsCapacity {
                item: item + 1,
                weight: items.weight(item),
                max_capacity,
            });
        }
        let total_weight = items.total_weight();
        let total_capacity = fleet.total_capacity();
        if exceeds_capacity(total_weight, total_capacity) {
            return Err(InfeasibilityCause::InsufficientCapacity {
                total_weight,
                total_capacity,
            });
        }

        let slots = fleet.slots();
        let n_items = items.len();
        let n_slots = slots.len();
        let mut program = BinaryProgram::new(name, Sense::Minimize);

        let used: Vec<VarId> = slots
            .iter()
            .enumerate()
            .map(|(s, slot)| program.add_binary(format!("y_{s}"), slot.capacity))
            .collect();

        let mut assign = Vec::with_capacity(n_items * n_slots);
        for i in 0..n_items {
            for s in 0..n_slots {
                assign.push(program.add_binary(format!("x_{i},{s}"), 0.0));
            }
        }

        for i in 0..n_items {
            let terms = assign[i * n_slots..(i + 1) * n_slots]
                .iter()
                .map(|&x| (x, 1.0))
                .collect();
            program.add_constraint(
                format!("assign_{i}"),
                ConstraintClass::Assignment,
                terms,
                1.0,
                1.0,
            );
        }

        for (s, slot) in slots.iter().enumerate() {
            let mut terms: Vec<(VarId, f64)> = (0..n_items)
                .map(|i| (assign[i * n_slots + s], items.weight(i)))
                .collect();
            terms.push((used[s], -slot.capacity));
            program.add_constraint(
                format!("capacity_{s}"),
                ConstraintClass::CapacityCoupling,
                terms,
                f64::NEG_INFINITY,
                0.0,
            );
        }

        debug!(
            "[MODEL] {}: {} items, {} slots, {} vars, {} constraints",
            program.name(),
            n_items,
            n_slots,
            program.n_vars(),
            program.n_constraints()
        );

        Ok(Self {
            program,
            slots,
            n_items,
            assign,
            used,
        })
    }

    pub fn program(&self) -> &BinaryProgram {
        &self.program
    }

    pub fn slots(&self) -> &[TruckSlot] {
        &self.slots
    }

    pub fn n_items(&self) -> usize {
        self.n_items
    }

    pub fn n_slots(&self) -> usize {
        self.slots.len()
    }

    /// The variable that is 1 iff `item` is loaded onto `slot`.
    #[inline]
    pub fn assign_var(&self, item: usize, slot: usize) -> VarId {
        self.assign[item * self.slots.len() + slot]
    }

    /// The variable that is 1 iff `slot` carries anything.
    #[inline]
    pub fn used_var(&self, slot: usize) -> VarId {
        self.used[slot]
    }

    /// Number of used slots per truck type in a solved value vector.
    pub fn used_per_type(&self, values: &[f64], n_types: usize) -> Vec<usize> {
        let mut counts = vec![0; n_types];
        for (s, slot) in self.slots.iter().enumerate() {
            if is_set(values[self.used[s].get()]) {
                counts[slot.type_index] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(weights: &[f64]) -> ItemSet {
        ItemSet::new(weights.to_vec()).unwrap()
    }

    #[test]
    fn builds_one_variable_per_pair_and_slot() {
        let model = LoadingModel::build(
            "both",
            &items(&[10.0, 10.0, 10.0]),
            &Fleet::with_counts(&[15.0, 20.0], &[1, 2]),
        )
        .unwrap();
        let program = model.program();

        assert_eq!(model.n_slots(), 3);
        assert_eq!(program.n_vars(), 3 * 3 + 3);
        assert_eq!(program.n_constraints(), 3 + 3);
        assert_eq!(program.sense(), Sense::Minimize);

        // objective charges the slot capacity on the used-indicator only
        assert_eq!(program.vars()[model.used_var(0).get()].obj, 15.0);
        assert_eq!(program.vars()[model.used_var(2).get()].obj, 20.0);
        assert_eq!(program.vars()[model.assign_var(1, 2).get()].obj, 0.0);
        assert_eq!(program.vars()[model.assign_var(1, 2).get()].name, "x_1,2");
    }

    #[test]
    fn constraint_rows_have_expected_shape() {
        let model = LoadingModel::build(
            "t1",
            &items(&[4.0, 6.0]),
            &Fleet::with_counts(&[10.0, 12.0], &[2, 0]),
        )
        .unwrap();
        let constraints = model.program().constraints();

        let assignment: Vec<_> = constraints
            .iter()
            .filter(|c| c.class == ConstraintClass::Assignment)
            .collect();
        assert_eq!(assignment.len(), 2);
        assert!(assignment.iter().all(|c| c.lhs == 1.0 && c.rhs == 1.0));
        assert!(assignment.iter().all(|c| c.terms.len() == 2));

        let coupling: Vec<_> = constraints
            .iter()
            .filter(|c| c.class == ConstraintClass::CapacityCoupling)
            .collect();
        assert_eq!(coupling.len(), 2);
        let row = coupling[1];
        assert_eq!(row.rhs, 0.0);
        assert!(row.terms.contains(&(model.assign_var(0, 1), 4.0)));
        assert!(row.terms.contains(&(model.assign_var(1, 1), 6.0)));
        assert!(row.terms.contains(&(model.used_var(1), -10.0)));
    }

    #[test]
    fn coupling_forbids_load_on_unused_slot() {
        let model = LoadingModel::build(
            "t1",
            &items(&[4.0, 6.0]),
            &Fleet::with_counts(&[10.0], &[2]),
        )
        .unwrap();
        let program = model.program();
        let mut values = vec![0.0; program.n_vars()];
        values[model.assign_var(0, 0).get()] = 1.0;
        values[model.assign_var(1, 0).get()] = 1.0;
        assert!(!program.is_satisfied_by(&values, BINARY_TOLERANCE));

        values[model.used_var(0).get()] = 1.0;
        assert!(program.is_satisfied_by(&values, BINARY_TOLERANCE));
        assert_eq!(program.objective(&values), 10.0);
        assert_eq!(model.used_per_type(&values, 1), vec![1]);
    }

    #[test]
    fn decimal_weights_may_fill_a_truck_exactly() {
        let model = LoadingModel::build(
            "t1",
            &items(&[7.4, 7.4, 7.4]),
            &Fleet::with_counts(&[22.2], &[1]),
        )
        .unwrap();
        assert_eq!(model.n_slots(), 1);
    }

    #[test]
    fn rejects_trivially_infeasible_fleets() {
        let heavy = items(&[5.0, 30.0]);
        assert_eq!(
            LoadingModel::build("m", &heavy, &Fleet::with_counts(&[22.2, 27.6], &[3, 3]))
                .unwrap_err(),
            InfeasibilityCause::ItemExceedsCapacity {
                item: 2,
                weight: 30.0,
                max_capacity: 27.6
            }
        );
        assert_eq!(
            LoadingModel::build("m", &heavy, &Fleet::with_counts(&[40.0], &[0])).unwrap_err(),
            InfeasibilityCause::NoSlots
        );
        assert!(matches!(
            LoadingModel::build("m", &items(&[8.0, 8.0, 8.0]), &Fleet::with_counts(&[10.0], &[2]))
                .unwrap_err(),
            InfeasibilityCause::InsufficientCapacity { .. }
        ));
    }
}

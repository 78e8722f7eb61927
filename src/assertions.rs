use crate::extract::Packing;
use crate::items::{ItemSet, exceeds_capacity};
use crate::model::{LoadingModel, is_set};
use crate::solver::RawSolution;
use float_cmp::approx_eq;
use log::error;

//Checks on solved packings
//Used in debug_assert!() blocks and tests

const TOLERANCE: f64 = 1e-6;

/// Every item shows up in exactly one truck.
pub fn packing_is_partition(packing: &Packing, items: &ItemSet) -> bool {
    let mut seen = vec![0usize; items.len()];
    for truck in &packing.trucks {
        for &item in &truck.items {
            match seen.get_mut(item.wrapping_sub(1)) {
                Some(count) => *count += 1,
                None => {
                    error!("truck {} carries unknown item {}", truck.display_index, item);
                    return false;
                }
            }
        }
    }
    match seen.iter().position(|&c| c != 1) {
        Some(i) => {
            error!("item {} is loaded {} times", i + 1, seen[i]);
            false
        }
        None => true,
    }
}

/// No truck carries more than its capacity.
pub fn packing_respects_capacity(packing: &Packing) -> bool {
    packing.trucks.iter().all(|truck| {
        let ok = !exceeds_capacity(truck.load(), truck.capacity);
        if !ok {
            error!(
                "truck {} carries {} over capacity {}",
                truck.display_index,
                truck.load(),
                truck.capacity
            );
        }
        ok
    })
}

/// A slot's used-indicator is set iff something is assigned to it.
pub fn used_matches_load(model: &LoadingModel, solution: &RawSolution) -> bool {
    let values = &solution.values;
    (0..model.n_slots()).all(|s| {
        let used = is_set(values[model.used_var(s).get()]);
        let loaded = (0..model.n_items()).any(|i| is_set(values[model.assign_var(i, s).get()]));
        if used != loaded {
            error!("slot {s}: used-indicator {used}, carries items {loaded}");
        }
        used == loaded
    })
}

/// The reported objective is the committed capacity of the used trucks.
pub fn objective_matches_committed_capacity(packing: &Packing) -> bool {
    approx_eq!(
        f64,
        packing.objective,
        packing.committed_capacity(),
        epsilon = TOLERANCE
    )
}

/// Specific load lies in (0, 1].
pub fn specific_load_in_range(packing: &Packing) -> bool {
    packing.specific_load > 0.0 && packing.specific_load <= 1.0 + TOLERANCE
}

//! A solver-neutral binary linear program.
//!
//! Variables live in an arena and are referred to by [`VarId`]; constraints
//! are ranges `lhs <= sum(coef * var) <= rhs`, the same shape SCIP's linear
//! constraints take.

use serde::Serialize;

/// Index of a variable in a [`BinaryProgram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Which family of constraints a row belongs to. Used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstraintClass {
    /// Each item goes to exactly one slot.
    Assignment,
    /// A slot's load stays below its capacity times its used-indicator.
    CapacityCoupling,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    /// Objective coefficient.
    pub obj: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearConstraint {
    pub name: String,
    pub class: ConstraintClass,
    pub terms: Vec<(VarId, f64)>,
    pub lhs: f64,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Left-hand activity for a value vector indexed by [`VarId`].
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values[var.get()])
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryProgram {
    name: String,
    sense: Sense,
    vars: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
}

impl BinaryProgram {
    pub fn new(name: impl Into<String>, sense: Sense) -> Self {
        Self {
            name: name.into(),
            sense,
            vars: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Adds a binary variable with objective coefficient `obj`.
    pub fn add_binary(&mut self, name: impl Into<String>, obj: f64) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(Variable {
            name: name.into(),
            obj,
        });
        id
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        class: ConstraintClass,
        terms: Vec<(VarId, f64)>,
        lhs: f64,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            class,
            terms,
            lhs,
            rhs,
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn n_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn n_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value of a value vector indexed by [`VarId`].
    pub fn objective(&self, values: &[f64]) -> f64 {
        self.vars
            .iter()
            .zip(values)
            .map(|(var, value)| var.obj * value)
            .sum()
    }

    /// Whether `values` satisfies every constraint within `tolerance`.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.vars.len()
            && self.constraints.iter().all(|c| {
                let activity = c.activity(values);
                activity >= c.lhs - tolerance && activity <= c.rhs + tolerance
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_activity_and_objective() {
        let mut program = BinaryProgram::new("tiny", Sense::Minimize);
        let a = program.add_binary("a", 3.0);
        let b = program.add_binary("b", 5.0);
        program.add_constraint(
            "pick_one",
            ConstraintClass::Assignment,
            vec![(a, 1.0), (b, 1.0)],
            1.0,
            1.0,
        );

        assert_eq!(program.n_vars(), 2);
        assert_eq!(program.n_constraints(), 1);
        assert_eq!(program.objective(&[1.0, 0.0]), 3.0);
        assert!(program.is_satisfied_by(&[0.0, 1.0], 1e-6));
        assert!(!program.is_satisfied_by(&[1.0, 1.0], 1e-6));
        assert!(!program.is_satisfied_by(&[1.0], 1e-6));
    }
}

//! Loading rolls onto trucks of a few capacity classes so that the total
//! capacity of the trucks used is minimal.
//!
//! The loading problem is stated as a binary program ([`model`]) and handed
//! to a MILP solver ([`solver`]). [`phase::PhaseController`] sizes the fleet:
//! it solves once per truck type to learn how many trucks of that type are
//! enough, then solves the mixed fleet with those counts.

pub mod assertions;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fleet;
pub mod items;
pub mod logger;
pub mod model;
pub mod phase;
pub mod program;
pub mod report;
pub mod solver;
pub mod source;

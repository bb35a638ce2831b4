//! Consistency checking of partially specified Boolean systems.
//!
//! A system is a list of terms over `n` variables written with `0`, `1` and the
//! wildcard `x`; it is consistent when some assignment matches every term. The
//! [`classical`] engine walks the truth table, the quantum engine
//! ([`engine::QuantumChecker`]) encodes every term as an oracle, mirrors the
//! circuit and decides from the measured statistic `C`.

pub mod builder;
pub mod circuit;
pub mod classical;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod executor;
pub mod measure;
pub mod mirror;
pub mod spec;
pub mod term;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
mod tests;

pub use builder::construct_circuit;
pub use circuit::Circuit;
pub use config::CheckerConfig;
pub use engine::{QuantumChecker, QuantumVerdict};
pub use error::{Error, Result};
pub use spec::Specification;
pub use term::Term;

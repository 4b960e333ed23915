//! Task lifecycle management for taskhub.
//!
//! This module owns the only non-trivial invariant of the system: which
//! status transitions are legal, and which domain events an accepted
//! mutation fires. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

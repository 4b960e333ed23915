//! Notification fan-out for taskhub.
//!
//! Consumes the domain events emitted by the task state machine and turns
//! them into addressed notification records with deterministic content.
//! Delivery is best-effort relative to the task mutation: a sink failure is
//! logged, never propagated. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The dispatcher service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

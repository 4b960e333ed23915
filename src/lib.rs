//! Taskhub: task lifecycle core with notification fan-out.
//!
//! This crate implements the heart of a task-management platform: the task
//! status state machine and the notification dispatch it drives. REST
//! plumbing, authentication, and UI belong to the surrounding services and
//! talk to this core through narrow collaborator ports.
//!
//! # Architecture
//!
//! Taskhub follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory here)
//!
//! # Modules
//!
//! - [`task`]: Task aggregate, status state machine, and lifecycle services
//! - [`notification`]: Domain-event dispatch into addressed notifications

pub mod notification;
pub mod task;

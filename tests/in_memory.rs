//! In-memory integration tests for the task and notification contexts.
//!
//! Tests are organized into modules by functionality:
//! - `task_lifecycle_tests`: Creation, transitions, updates, deletion
//! - `notification_flow_tests`: Event fan-out through the dispatcher

mod in_memory {
    pub mod helpers;

    mod notification_flow_tests;
    mod task_lifecycle_tests;
}

//! Application services for task lifecycle orchestration.

mod events;
mod lifecycle;

pub use events::{EventPublisher, EventStream};
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService, TaskMutation,
    UpdateTaskRequest,
};

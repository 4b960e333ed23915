//! Domain model for task lifecycle management.
//!
//! The task domain owns the status state machine and decides, for every
//! accepted mutation, which domain events fire. All infrastructure concerns
//! stay outside the domain boundary.

mod error;
mod event;
mod fields;
mod ids;
mod task;

pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use event::{DomainEvent, TaskSnapshot};
pub use fields::{TaskDescription, TaskPriority, TaskTitle};
pub use ids::{TaskId, UserId};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskPatch, TaskStatus};

//! Service layer orchestrating task mutations and their event fan-out.

use crate::notification::ports::NotificationSink;
use crate::task::{
    domain::{
        DomainEvent, NewTaskData, Task, TaskDescription, TaskDomainError, TaskId, TaskPatch,
        TaskPriority, TaskStatus, TaskTitle, UserId,
    },
    ports::{DirectoryError, TaskStore, TaskStoreError, UserDirectory},
    services::EventPublisher,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    priority: Option<TaskPriority>,
    assigned_to: UserId,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub const fn new(title: String, assigned_to: UserId) -> Self {
        Self {
            title,
            description: None,
            priority: None,
            assigned_to,
            due_date: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the task priority. Defaults to medium when absent.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the due date; must be strictly in the future.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Request payload for updating non-status task fields, optionally combined
/// with a status transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    priority: Option<TaskPriority>,
    due_date: Option<DateTime<Utc>>,
    status: Option<TaskStatus>,
}

impl UpdateTaskRequest {
    /// Creates an empty update request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a replacement priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets a replacement due date; must be strictly in the future.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Requests a status transition as part of the update.
    ///
    /// A rejected transition aborts the entire update.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Validates the raw field values into a domain patch.
    fn into_patch(self) -> Result<TaskPatch, TaskDomainError> {
        Ok(TaskPatch {
            title: self.title.map(TaskTitle::new).transpose()?,
            description: self.description.map(TaskDescription::new).transpose()?,
            priority: self.priority,
            due_date: self.due_date,
            status: self.status,
        })
    }
}

/// Outcome of an accepted task mutation: the committed task record and the
/// ordered events the mutation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMutation {
    /// Task record after the mutation.
    pub task: Task,
    /// Events emitted by the mutation, in emission order.
    pub events: Vec<DomainEvent>,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or transition failure.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// The assignee does not resolve to an existing user.
    #[error("invalid assignee: no user with id {0}")]
    InvalidAssignee(UserId),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Mutations on one task id are serialized through a per-id lock so that two
/// concurrent transitions can never both observe the same pre-state;
/// operations on different ids proceed independently. Every accepted
/// mutation publishes its events through the [`EventPublisher`] after the
/// store write commits; publication and notification delivery can never fail
/// a committed mutation.
pub struct TaskLifecycleService<S, U, N, C>
where
    S: TaskStore,
    U: UserDirectory,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    directory: Arc<U>,
    sink: Arc<N>,
    clock: Arc<C>,
    publisher: EventPublisher,
    locks: Arc<Mutex<HashMap<TaskId, Arc<Mutex<()>>>>>,
}

impl<S, U, N, C> Clone for TaskLifecycleService<S, U, N, C>
where
    S: TaskStore,
    U: UserDirectory,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            directory: Arc::clone(&self.directory),
            sink: Arc::clone(&self.sink),
            clock: Arc::clone(&self.clock),
            publisher: self.publisher.clone(),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<S, U, N, C> TaskLifecycleService<S, U, N, C>
where
    S: TaskStore,
    U: UserDirectory,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        directory: Arc<U>,
        sink: Arc<N>,
        clock: Arc<C>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            store,
            directory,
            sink,
            clock,
            publisher,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a new task in the pending state.
    ///
    /// Emits a `TaskCreated` event followed by a `TaskAssigned` event, both
    /// addressed to the assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for field validation failures,
    /// [`TaskLifecycleError::InvalidAssignee`] when the assignee does not
    /// resolve, or [`TaskLifecycleError::Store`] when persistence rejects
    /// the write.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<TaskMutation> {
        let title = TaskTitle::new(request.title)?;
        let description = request
            .description
            .map(TaskDescription::new)
            .transpose()?
            .unwrap_or_default();
        self.resolve_assignee(request.assigned_to).await?;

        let data = NewTaskData {
            title,
            description,
            priority: request.priority.unwrap_or_default(),
            assigned_to: request.assigned_to,
            due_date: request.due_date,
        };
        let (task, events) = Task::new(data, &*self.clock)?;
        self.store.store(&task).await?;
        self.publisher.publish_all(&events);
        Ok(TaskMutation { task, events })
    }

    /// Requests a status transition on an existing task.
    ///
    /// A same-status request is an idempotent no-op producing no events.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist
    /// or [`TaskLifecycleError::Domain`] when the edge is illegal; the task
    /// is left unchanged in that case.
    pub async fn request_transition(
        &self,
        id: TaskId,
        target: TaskStatus,
    ) -> TaskLifecycleResult<TaskMutation> {
        let guard = self.lock_for(id).await;
        let _held = guard.lock().await;

        let mut task = self.load(id).await?;
        let events = task.transition_to(target, &*self.clock)?;
        if !events.is_empty() {
            self.store.update(&task).await?;
            self.publisher.publish_all(&events);
        }
        Ok(TaskMutation { task, events })
    }

    /// Reassigns a task to a new user.
    ///
    /// Reassigning to the current assignee is a no-op. Otherwise emits a
    /// `TaskAssigned` event to the new assignee and an informational
    /// `TaskReassigned` event to the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidAssignee`] when the new assignee
    /// does not resolve, or [`TaskLifecycleError::NotFound`] when the task
    /// does not exist.
    pub async fn reassign(
        &self,
        id: TaskId,
        new_assignee: UserId,
    ) -> TaskLifecycleResult<TaskMutation> {
        self.resolve_assignee(new_assignee).await?;

        let guard = self.lock_for(id).await;
        let _held = guard.lock().await;

        let mut task = self.load(id).await?;
        let events = task.reassign_to(new_assignee, &*self.clock);
        if !events.is_empty() {
            self.store.update(&task).await?;
            self.publisher.publish_all(&events);
        }
        Ok(TaskMutation { task, events })
    }

    /// Applies a field update, all-or-nothing.
    ///
    /// A status transition carried by the request is validated first; its
    /// rejection aborts the entire update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for validation or transition
    /// failures and [`TaskLifecycleError::NotFound`] for a missing task; no
    /// partial mutation is ever persisted.
    pub async fn update_fields(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<TaskMutation> {
        let patch = request.into_patch()?;

        let guard = self.lock_for(id).await;
        let _held = guard.lock().await;

        let mut task = self.load(id).await?;
        let events = task.apply_patch(patch, &*self.clock)?;
        if !events.is_empty() {
            self.store.update(&task).await?;
            self.publisher.publish_all(&events);
        }
        Ok(TaskMutation { task, events })
    }

    /// Deletes a task and cascades the removal of its notifications.
    ///
    /// The cascade call to the notification sink is made synchronously as
    /// part of the delete; a sink failure is logged and does not fail the
    /// delete, since the sink guarantees eventual removal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not
    /// exist.
    pub async fn delete(&self, id: TaskId) -> TaskLifecycleResult<()> {
        let guard = self.lock_for(id).await;
        {
            let _held = guard.lock().await;
            self.load(id).await?;
            self.store.delete(id).await.map_err(|err| match err {
                TaskStoreError::NotFound(task_id) => TaskLifecycleError::NotFound(task_id),
                other => TaskLifecycleError::Store(other),
            })?;

            if let Err(err) = self.sink.delete_by_task(id).await {
                tracing::warn!(task_id = %id, error = %err, "cascade delete of notifications failed");
            }
        }

        let mut locks = self.locks.lock().await;
        locks.remove(&id);
        Ok(())
    }

    /// Evaluates a task's due date and emits a due-soon or overdue event
    /// when applicable.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not
    /// exist.
    pub async fn check_due_date(&self, id: TaskId) -> TaskLifecycleResult<Vec<DomainEvent>> {
        let task = self.load(id).await?;
        let events: Vec<DomainEvent> = task.due_alert(self.clock.utc()).into_iter().collect();
        self.publisher.publish_all(&events);
        Ok(events)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when no such task exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn find(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Loads a task or fails with `NotFound`.
    async fn load(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Resolves an assignee or fails with `InvalidAssignee`.
    async fn resolve_assignee(&self, id: UserId) -> TaskLifecycleResult<()> {
        match self.directory.resolve(id).await? {
            Some(_) => Ok(()),
            None => Err(TaskLifecycleError::InvalidAssignee(id)),
        }
    }

    /// Returns the mutation lock for a task id, creating it on first use.
    async fn lock_for(&self, id: TaskId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(id).or_default())
    }
}

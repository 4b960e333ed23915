//! Domain model for addressed notifications.

mod error;
mod notification;

pub use error::{NotificationDomainError, ParseNotificationTypeError};
pub use notification::{Notification, NotificationDraft, NotificationId, NotificationType};

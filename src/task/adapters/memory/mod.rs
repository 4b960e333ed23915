//! In-memory adapter implementations for task ports.

mod directory;
mod store;

pub use directory::InMemoryUserDirectory;
pub use store::InMemoryTaskStore;

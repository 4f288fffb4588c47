//! Coordinator task aggregate

pub mod model;
pub mod repository;

pub use model::{Task, TaskPriority, TaskStatus};
pub use repository::TaskRepository;

pub mod handlers;

pub use handlers::NotificationAppState;

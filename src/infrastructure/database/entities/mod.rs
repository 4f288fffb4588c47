//! Database entities module

pub mod counter;
pub mod incident;
pub mod notification;
pub mod reservation;
pub mod scan_log;
pub mod spot;
pub mod task;
pub mod ticket;
pub mod user;
pub mod zone;

pub use counter::Entity as Counter;
pub use incident::Entity as Incident;
pub use notification::Entity as Notification;
pub use reservation::Entity as Reservation;
pub use scan_log::Entity as ScanLog;
pub use spot::Entity as Spot;
pub use task::Entity as Task;
pub use ticket::Entity as Ticket;
pub use user::Entity as User;
pub use zone::Entity as Zone;

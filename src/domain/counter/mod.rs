//! Entry/exit counter aggregate
//!
//! Contains the Counter entity, the load-balancing candidate ranking, and
//! the repository interface.

pub mod model;
pub mod repository;

pub use model::{rank_candidates, Counter, CounterStatus};
pub use repository::CounterRepository;

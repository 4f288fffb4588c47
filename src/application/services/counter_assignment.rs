//! Counter assignment service
//!
//! Picks the least-loaded active counter for a new party and records the
//! increased load. Candidates are ranked by direction, fill ratio and
//! absolute load; the increment itself is a conditional update that
//! re-validates capacity at write time, so a candidate raced out by a
//! concurrent assignment simply falls through to the next one.
//!
//! When no counter has room the best-ranked counter absorbs the overflow
//! rather than rejecting the party; only an empty active-counter set is a
//! hard failure.

use std::sync::Arc;

use log::{info, warn};

use crate::domain::counter::{rank_candidates, Counter};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct CounterAssignmentService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CounterAssignmentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Assign a party of `people` to one active counter and durably
    /// record the increased load. Returns the updated counter.
    pub async fn assign(&self, people: i64) -> DomainResult<Counter> {
        if people < 1 {
            return Err(DomainError::Validation(
                "party size must be at least 1".to_string(),
            ));
        }

        let active = self.repos.counters().find_active().await?;
        if active.is_empty() {
            return Err(DomainError::NoCountersAvailable);
        }

        let ranked = rank_candidates(active);

        // First pass: candidates with room, in rank order. The conditional
        // increment re-checks capacity, so losing a race here just moves
        // on to the next candidate.
        for candidate in ranked.iter().filter(|c| c.has_room(people)) {
            if self
                .repos
                .counters()
                .try_increment_load(&candidate.id, people)
                .await?
            {
                info!(
                    "Assigned party of {} to counter {} (load {} -> {})",
                    people,
                    candidate.name,
                    candidate.load,
                    candidate.load + people
                );
                return self.reload(&candidate.id).await;
            }
        }

        // Overflow fallback: everything is full, the best-ranked counter
        // takes the party anyway.
        let first = &ranked[0];
        warn!(
            "All counters at capacity, overflowing party of {} onto {}",
            people, first.name
        );
        self.repos
            .counters()
            .increment_load(&first.id, people)
            .await?;
        self.reload(&first.id).await
    }

    /// Release `people` from a counter's load, floored at zero.
    pub async fn release(&self, counter_id: &str, people: i64) -> DomainResult<()> {
        self.repos.counters().release_load(counter_id, people).await
    }

    async fn reload(&self, id: &str) -> DomainResult<Counter> {
        self.repos
            .counters()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Counter",
                field: "id",
                value: id.to_string(),
            })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    use crate::domain::counter::{CounterRepository, CounterStatus};
    use crate::domain::incident::IncidentRepository;
    use crate::domain::notification::NotificationRepository;
    use crate::domain::parking::ParkingRepository;
    use crate::domain::reservation::ReservationRepository;
    use crate::domain::task::TaskRepository;
    use crate::domain::ticket::TicketRepository;
    use crate::domain::user::UserRepository;

    /// In-memory counter repository mirroring the conditional-update
    /// semantics of the SeaORM implementation.
    #[derive(Default)]
    struct MemCounters {
        items: Mutex<Vec<Counter>>,
    }

    #[async_trait]
    impl CounterRepository for MemCounters {
        async fn save(&self, c: Counter) -> DomainResult<()> {
            self.items.lock().unwrap().push(c);
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> DomainResult<Option<Counter>> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id)
                .cloned())
        }

        async fn find_by_name(&self, name: &str) -> DomainResult<Option<Counter>> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.name == name)
                .cloned())
        }

        async fn find_all(&self) -> DomainResult<Vec<Counter>> {
            Ok(self.items.lock().unwrap().clone())
        }

        async fn find_active(&self) -> DomainResult<Vec<Counter>> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.is_active)
                .cloned()
                .collect())
        }

        async fn update(&self, c: Counter) -> DomainResult<()> {
            let mut items = self.items.lock().unwrap();
            match items.iter_mut().find(|x| x.id == c.id) {
                Some(slot) => {
                    *slot = c;
                    Ok(())
                }
                None => Err(DomainError::NotFound {
                    entity: "Counter",
                    field: "id",
                    value: c.id,
                }),
            }
        }

        async fn delete(&self, id: &str) -> DomainResult<()> {
            self.items.lock().unwrap().retain(|c| c.id != id);
            Ok(())
        }

        async fn try_increment_load(&self, id: &str, people: i64) -> DomainResult<bool> {
            let mut items = self.items.lock().unwrap();
            if let Some(c) = items.iter_mut().find(|c| c.id == id) {
                if c.capacity <= 0 || c.load + people <= c.capacity {
                    c.load += people;
                    return Ok(true);
                }
            }
            Ok(false)
        }

        async fn increment_load(&self, id: &str, people: i64) -> DomainResult<()> {
            if let Some(c) = self.items.lock().unwrap().iter_mut().find(|c| c.id == id) {
                c.load += people;
            }
            Ok(())
        }

        async fn release_load(&self, id: &str, people: i64) -> DomainResult<()> {
            if let Some(c) = self.items.lock().unwrap().iter_mut().find(|c| c.id == id) {
                c.load = (c.load - people).max(0);
            }
            Ok(())
        }
    }

    /// Provider stub exposing only the counter repository.
    #[derive(Default)]
    struct StubRepos {
        counters: MemCounters,
    }

    impl RepositoryProvider for StubRepos {
        fn users(&self) -> &dyn UserRepository {
            unimplemented!()
        }
        fn counters(&self) -> &dyn CounterRepository {
            &self.counters
        }
        fn tickets(&self) -> &dyn TicketRepository {
            unimplemented!()
        }
        fn parking(&self) -> &dyn ParkingRepository {
            unimplemented!()
        }
        fn reservations(&self) -> &dyn ReservationRepository {
            unimplemented!()
        }
        fn tasks(&self) -> &dyn TaskRepository {
            unimplemented!()
        }
        fn incidents(&self) -> &dyn IncidentRepository {
            unimplemented!()
        }
        fn notifications(&self) -> &dyn NotificationRepository {
            unimplemented!()
        }
    }

    fn counter(id: &str, status: CounterStatus, capacity: i64, load: i64) -> Counter {
        Counter {
            id: id.to_string(),
            name: id.to_string(),
            entrance: "north".to_string(),
            status: Some(status),
            capacity,
            load,
            staff: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn service_with(counters: Vec<Counter>) -> (CounterAssignmentService, Arc<StubRepos>) {
        let repos = Arc::new(StubRepos::default());
        for c in counters {
            repos.counters.save(c).await.unwrap();
        }
        (CounterAssignmentService::new(repos.clone()), repos)
    }

    #[tokio::test]
    async fn prefers_entry_counter_with_lowest_ratio() {
        let (service, repos) = service_with(vec![
            counter("a", CounterStatus::Entry, 10, 9),
            counter("b", CounterStatus::Entry, 10, 1),
            counter("c", CounterStatus::Exit, 10, 0),
        ])
        .await;

        let assigned = service.assign(1).await.unwrap();
        assert_eq!(assigned.id, "b");
        assert_eq!(assigned.load, 2);

        // others untouched
        assert_eq!(repos.counters.find_by_id("a").await.unwrap().unwrap().load, 9);
        assert_eq!(repos.counters.find_by_id("c").await.unwrap().unwrap().load, 0);
    }

    #[tokio::test]
    async fn skips_counter_without_room_for_party() {
        let (service, _) = service_with(vec![
            counter("tight", CounterStatus::Entry, 10, 9),
            counter("roomy", CounterStatus::Entry, 10, 5),
        ])
        .await;

        // party of 3 does not fit in "tight" (9+3 > 10)
        let assigned = service.assign(3).await.unwrap();
        assert_eq!(assigned.id, "roomy");
        assert_eq!(assigned.load, 8);
    }

    #[tokio::test]
    async fn overflow_falls_back_to_best_ranked() {
        let (service, _) = service_with(vec![
            counter("a", CounterStatus::Entry, 5, 5),
            counter("b", CounterStatus::Exit, 5, 5),
        ])
        .await;

        let assigned = service.assign(2).await.unwrap();
        // both full; "a" ranks first (entry) and absorbs the overflow
        assert_eq!(assigned.id, "a");
        assert_eq!(assigned.load, 7);
    }

    #[tokio::test]
    async fn empty_counter_set_is_rejected() {
        let (service, _) = service_with(vec![]).await;
        let err = service.assign(1).await.unwrap_err();
        assert!(matches!(err, DomainError::NoCountersAvailable));
    }

    #[tokio::test]
    async fn inactive_counters_are_ignored() {
        let mut inactive = counter("gone", CounterStatus::Entry, 10, 0);
        inactive.is_active = false;
        let (service, _) = service_with(vec![inactive]).await;

        let err = service.assign(1).await.unwrap_err();
        assert!(matches!(err, DomainError::NoCountersAvailable));
    }

    #[tokio::test]
    async fn unbounded_counter_accepts_any_party() {
        let (service, _) = service_with(vec![counter("open", CounterStatus::Entry, 0, 100)]).await;
        let assigned = service.assign(50).await.unwrap();
        assert_eq!(assigned.load, 150);
    }

    #[tokio::test]
    async fn zero_party_is_invalid() {
        let (service, _) = service_with(vec![counter("a", CounterStatus::Entry, 10, 0)]).await;
        assert!(matches!(
            service.assign(0).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn release_floors_at_zero() {
        let (service, repos) = service_with(vec![counter("a", CounterStatus::Entry, 10, 3)]).await;
        service.release("a", 5).await.unwrap();
        assert_eq!(repos.counters.find_by_id("a").await.unwrap().unwrap().load, 0);
    }
}

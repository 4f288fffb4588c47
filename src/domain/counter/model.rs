//! Counter domain entity and assignment ranking

use chrono::{DateTime, Utc};

/// Which direction a counter serves.
///
/// Entry counters are filled first, then dual-direction, then exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStatus {
    Entry,
    Exit,
    Both,
}

impl CounterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
            Self::Both => "both",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(Self::Entry),
            "exit" => Some(Self::Exit),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    /// Sort key for assignment: entry → 0, both → 1, exit → 2.
    fn priority(self) -> u8 {
        match self {
            Self::Entry => 0,
            Self::Both => 1,
            Self::Exit => 2,
        }
    }
}

impl std::fmt::Display for CounterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical entry/exit checkpoint with a capacity and current occupancy.
#[derive(Debug, Clone)]
pub struct Counter {
    pub id: String,
    pub name: String,
    pub entrance: String,
    /// Raw status string as stored; unrecognized values rank last.
    pub status: Option<CounterStatus>,
    /// 0 means unbounded
    pub capacity: i64,
    /// Attendees assigned but not yet checked in
    pub load: i64,
    pub staff: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Counter {
    /// Whether a party of `people` fits without exceeding capacity.
    /// Unbounded counters (capacity <= 0) always have room.
    pub fn has_room(&self, people: i64) -> bool {
        self.capacity <= 0 || self.load + people <= self.capacity
    }

    /// Fill fraction used as the secondary assignment key.
    /// Unbounded counters compare by raw load.
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity > 0 {
            self.load as f64 / self.capacity as f64
        } else {
            self.load as f64
        }
    }

    fn status_priority(&self) -> u8 {
        self.status.map(CounterStatus::priority).unwrap_or(3)
    }
}

/// Rank assignment candidates ascending by `(status_priority, fill_ratio,
/// load)`. The first candidate with room wins; with no room anywhere the
/// globally first-ranked counter absorbs the overflow.
pub fn rank_candidates(mut counters: Vec<Counter>) -> Vec<Counter> {
    counters.sort_by(|a, b| {
        a.status_priority()
            .cmp(&b.status_priority())
            .then_with(|| {
                a.fill_ratio()
                    .partial_cmp(&b.fill_ratio())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.load.cmp(&b.load))
    });
    counters
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(name: &str, status: CounterStatus, capacity: i64, load: i64) -> Counter {
        Counter {
            id: format!("id-{name}"),
            name: name.to_string(),
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

    #[test]
    fn entry_with_lower_ratio_beats_empty_exit() {
        let ranked = rank_candidates(vec![
            counter("a", CounterStatus::Entry, 10, 9),
            counter("b", CounterStatus::Entry, 10, 1),
            counter("c", CounterStatus::Exit, 10, 0),
        ]);
        assert_eq!(ranked[0].name, "b");
        assert_eq!(ranked[1].name, "a");
        assert_eq!(ranked[2].name, "c");
    }

    #[test]
    fn both_ranks_between_entry_and_exit() {
        let ranked = rank_candidates(vec![
            counter("exit", CounterStatus::Exit, 10, 0),
            counter("both", CounterStatus::Both, 10, 0),
            counter("entry", CounterStatus::Entry, 10, 9),
        ]);
        assert_eq!(ranked[0].name, "entry");
        assert_eq!(ranked[1].name, "both");
        assert_eq!(ranked[2].name, "exit");
    }

    #[test]
    fn equal_ratio_breaks_tie_by_load() {
        let ranked = rank_candidates(vec![
            counter("big", CounterStatus::Entry, 20, 10),
            counter("small", CounterStatus::Entry, 10, 5),
        ]);
        // both at 50% fill; the smaller absolute load wins
        assert_eq!(ranked[0].name, "small");
    }

    #[test]
    fn unbounded_counter_always_has_room() {
        let c = counter("open", CounterStatus::Entry, 0, 1_000);
        assert!(c.has_room(500));
    }

    #[test]
    fn room_check_respects_party_size() {
        let c = counter("tight", CounterStatus::Entry, 10, 8);
        assert!(c.has_room(2));
        assert!(!c.has_room(3));
    }

    #[test]
    fn unrecognized_status_ranks_last() {
        let mut odd = counter("odd", CounterStatus::Entry, 10, 0);
        odd.status = None;
        let ranked = rank_candidates(vec![odd, counter("exit", CounterStatus::Exit, 10, 9)]);
        assert_eq!(ranked[0].name, "exit");
    }

    #[test]
    fn status_string_roundtrip() {
        for status in [CounterStatus::Entry, CounterStatus::Exit, CounterStatus::Both] {
            assert_eq!(CounterStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(CounterStatus::from_str("sideways"), None);
    }
}

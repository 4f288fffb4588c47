//! User domain entity

use chrono::{DateTime, Utc};

/// Dashboard role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Organizer,
    Coordinator,
    CounterStaff,
    Attendee,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Organizer => "organizer",
            Self::Coordinator => "coordinator",
            Self::CounterStaff => "counter_staff",
            Self::Attendee => "attendee",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            "organizer" => Self::Organizer,
            "coordinator" => Self::Coordinator,
            "counter_staff" => Self::CounterStaff,
            _ => Self::Attendee,
        }
    }

    /// Staff roles may operate check-in scanners.
    pub fn can_scan(&self) -> bool {
        matches!(
            self,
            Self::Admin | Self::Organizer | Self::Coordinator | Self::CounterStaff
        )
    }

    /// Roles allowed to manage counters, zones and tasks.
    pub fn can_manage(&self) -> bool {
        matches!(self, Self::Admin | Self::Organizer)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registered user
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        for role in [
            UserRole::Admin,
            UserRole::Organizer,
            UserRole::Coordinator,
            UserRole::CounterStaff,
            UserRole::Attendee,
        ] {
            assert_eq!(UserRole::from_str(role.as_str()), role);
        }
    }

    #[test]
    fn unknown_role_defaults_to_attendee() {
        assert_eq!(UserRole::from_str("superuser"), UserRole::Attendee);
    }

    #[test]
    fn attendees_cannot_scan_or_manage() {
        assert!(!UserRole::Attendee.can_scan());
        assert!(!UserRole::Attendee.can_manage());
        assert!(UserRole::CounterStaff.can_scan());
        assert!(!UserRole::CounterStaff.can_manage());
        assert!(UserRole::Admin.can_manage());
    }
}

//! Ticket domain entity

use chrono::{DateTime, Utc};

/// Ticket category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketCategory {
    Individual,
    Family,
}

impl TicketCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Family => "family",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "family" => Self::Family,
            _ => Self::Individual,
        }
    }
}

impl std::fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status recorded at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "failed" => Self::Failed,
            _ => Self::Paid,
        }
    }
}

/// Payment sub-record embedded in a ticket
#[derive(Debug, Clone)]
pub struct Payment {
    /// Caller-supplied idempotency key
    pub payment_id: String,
    pub status: PaymentStatus,
    pub amount_cents: i64,
    pub currency: String,
    /// Masked card number, e.g. "**** **** **** 4242"
    pub card_masked: Option<String>,
}

/// Admission ticket issued at successful checkout
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: String,
    pub nic: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub category: TicketCategory,
    /// Party size; forced to 1 for individual tickets
    pub count: i64,
    pub payment: Payment,
    pub qr_payload: String,
    pub counter_id: Option<String>,
    /// Denormalized counter name, "unassigned" when no counter exists
    pub counter_label: String,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Party size for a category: individual is always 1.
    pub fn effective_count(category: TicketCategory, requested: i64) -> i64 {
        match category {
            TicketCategory::Individual => 1,
            TicketCategory::Family => requested.max(1),
        }
    }

    /// Mask a card number keeping the last four digits.
    pub fn mask_card(number: &str) -> String {
        let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
        let last4 = if digits.len() >= 4 {
            &digits[digits.len() - 4..]
        } else {
            digits.as_str()
        };
        format!("**** **** **** {last4}")
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn individual_count_forced_to_one() {
        assert_eq!(Ticket::effective_count(TicketCategory::Individual, 5), 1);
        assert_eq!(Ticket::effective_count(TicketCategory::Individual, 1), 1);
    }

    #[test]
    fn family_count_is_at_least_one() {
        assert_eq!(Ticket::effective_count(TicketCategory::Family, 4), 4);
        assert_eq!(Ticket::effective_count(TicketCategory::Family, 0), 1);
    }

    #[test]
    fn card_masking_keeps_last_four() {
        assert_eq!(
            Ticket::mask_card("4242 4242 4242 4242"),
            "**** **** **** 4242"
        );
        assert_eq!(Ticket::mask_card("12"), "**** **** **** 12");
    }

    #[test]
    fn category_parsing_defaults_to_individual() {
        assert_eq!(TicketCategory::from_str("family"), TicketCategory::Family);
        assert_eq!(
            TicketCategory::from_str("anything"),
            TicketCategory::Individual
        );
    }
}

//! QR payload wire codec
//!
//! Pipe-delimited key=value pairs with a literal `CF|` prefix:
//!
//! ```text
//! CF|v=1|key=<nic>|type=I|count=<n>|counter=<label>|pid=<paymentId>
//! ```
//!
//! `key`, `counter` and `pid` values are percent-encoded. `type` is `F`
//! for family tickets, anything else decodes as individual. Unknown
//! segments are ignored so the format can grow without breaking old
//! scanner builds.

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

use super::model::TicketCategory;
use crate::domain::{DomainError, DomainResult};

const PREFIX: &str = "CF|";
const VERSION: &str = "1";

/// Counter label used before a counter has been assigned.
pub const UNASSIGNED: &str = "unassigned";

/// Decoded contents of a ticket QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    pub nic: String,
    pub category: TicketCategory,
    pub count: i64,
    pub counter_label: String,
    pub payment_id: String,
}

impl QrPayload {
    pub fn new(
        nic: impl Into<String>,
        category: TicketCategory,
        count: i64,
        counter_label: impl Into<String>,
        payment_id: impl Into<String>,
    ) -> Self {
        Self {
            nic: nic.into(),
            category,
            count,
            counter_label: counter_label.into(),
            payment_id: payment_id.into(),
        }
    }

    /// Encode to the wire string.
    pub fn encode(&self) -> String {
        let ty = match self.category {
            TicketCategory::Family => "F",
            TicketCategory::Individual => "I",
        };
        format!(
            "{PREFIX}v={VERSION}|key={}|type={ty}|count={}|counter={}|pid={}",
            enc(&self.nic),
            self.count,
            enc(&self.counter_label),
            enc(&self.payment_id),
        )
    }

    /// Parse a scanned wire string.
    ///
    /// The `CF|` prefix is mandatory; everything else is best-effort with
    /// per-field defaults, except `pid` which must be present to resolve
    /// the ticket.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let rest = raw
            .strip_prefix(PREFIX)
            .ok_or_else(|| DomainError::Validation("not a CrowdFlow QR code".to_string()))?;

        let mut nic = String::new();
        let mut category = TicketCategory::Individual;
        let mut count: i64 = 1;
        let mut counter_label = UNASSIGNED.to_string();
        let mut payment_id: Option<String> = None;

        for segment in rest.split('|') {
            let Some((k, v)) = segment.split_once('=') else {
                // unknown / malformed segment, skip
                continue;
            };
            match k {
                "key" => nic = dec(v)?,
                "type" => {
                    category = if v == "F" {
                        TicketCategory::Family
                    } else {
                        TicketCategory::Individual
                    };
                }
                "count" => {
                    count = v.parse().map_err(|_| {
                        DomainError::Validation(format!("invalid count in QR code: {v}"))
                    })?;
                }
                "counter" => counter_label = dec(v)?,
                "pid" => payment_id = Some(dec(v)?),
                // v and future segments are ignored
                _ => {}
            }
        }

        let payment_id = payment_id
            .ok_or_else(|| DomainError::Validation("QR code is missing pid".to_string()))?;

        Ok(Self {
            nic,
            category,
            count,
            counter_label,
            payment_id,
        })
    }
}

fn enc(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn dec(value: &str) -> DomainResult<String> {
    percent_decode_str(value)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| DomainError::Validation("invalid encoding in QR code".to_string()))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_expected_wire_format() {
        let payload = QrPayload::new(
            "199012345678",
            TicketCategory::Family,
            4,
            "Gate A",
            "pay-001",
        );
        assert_eq!(
            payload.encode(),
            "CF|v=1|key=199012345678|type=F|count=4|counter=Gate%20A|pid=pay%2D001"
        );
    }

    #[test]
    fn roundtrip_preserves_fields() {
        let payload = QrPayload::new(
            "NIC/90=12",
            TicketCategory::Individual,
            1,
            UNASSIGNED,
            "p|1&2",
        );
        let parsed = QrPayload::parse(&payload.encode()).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn missing_prefix_is_rejected() {
        let err = QrPayload::parse("XX|v=1|pid=p1").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn unknown_segments_are_ignored() {
        let parsed =
            QrPayload::parse("CF|v=9|future=stuff|noequals|key=n1|type=I|count=1|pid=p1").unwrap();
        assert_eq!(parsed.payment_id, "p1");
        assert_eq!(parsed.nic, "n1");
    }

    #[test]
    fn type_decodes_f_as_family_everything_else_individual() {
        let fam = QrPayload::parse("CF|type=F|count=2|pid=p1").unwrap();
        assert_eq!(fam.category, TicketCategory::Family);
        let ind = QrPayload::parse("CF|type=X|pid=p1").unwrap();
        assert_eq!(ind.category, TicketCategory::Individual);
    }

    #[test]
    fn missing_pid_is_rejected() {
        let err = QrPayload::parse("CF|v=1|key=n1|type=I|count=1").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn defaults_apply_for_absent_fields() {
        let parsed = QrPayload::parse("CF|pid=p9").unwrap();
        assert_eq!(parsed.count, 1);
        assert_eq!(parsed.counter_label, UNASSIGNED);
        assert_eq!(parsed.category, TicketCategory::Individual);
    }

    #[test]
    fn bad_count_is_rejected() {
        let err = QrPayload::parse("CF|count=lots|pid=p1").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}

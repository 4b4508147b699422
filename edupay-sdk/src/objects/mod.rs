pub mod create_payment;
pub mod transactions;
pub mod webhook;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Payment status as reported by the gateway.
///
/// The gateway vocabulary is not closed, so any value outside the
/// well-known set is carried through verbatim instead of being
/// rejected. Matching is case-sensitive: values are stored and
/// compared exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Other(CompactString),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Other(value) => value.as_str(),
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(value: &str) -> Self {
        match value {
            "pending" => PaymentStatus::Pending,
            "success" => PaymentStatus::Success,
            "failed" => PaymentStatus::Failed,
            other => PaymentStatus::Other(CompactString::from(other)),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        PaymentStatus::from(value.as_str())
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = CompactString::deserialize(deserializer)?;
        Ok(PaymentStatus::from(value.as_str()))
    }
}

/// Student the payment is collected for.
///
/// Stored alongside the order and echoed back in transaction listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentInfo {
    pub name: String,
    pub id: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_known_values() {
        for (status, text) in [
            (PaymentStatus::Pending, "\"pending\""),
            (PaymentStatus::Success, "\"success\""),
            (PaymentStatus::Failed, "\"failed\""),
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, text);
            let parsed: PaymentStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn status_preserves_unknown_values_verbatim() {
        let parsed: PaymentStatus = serde_json::from_str("\"USER_DROPPED\"").unwrap();
        assert_eq!(
            parsed,
            PaymentStatus::Other(CompactString::from("USER_DROPPED"))
        );
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"USER_DROPPED\"");
    }

    #[test]
    fn status_matching_is_case_sensitive() {
        let parsed: PaymentStatus = serde_json::from_str("\"Pending\"").unwrap();
        assert_eq!(
            parsed,
            PaymentStatus::Other(CompactString::from("Pending"))
        );
    }
}

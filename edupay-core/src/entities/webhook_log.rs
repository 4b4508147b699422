use compact_str::CompactString;
use time::OffsetDateTime;
use uuid::Uuid;

/// Event type of an entry recording a processed callback.
pub const EVENT_PAYMENT_UPDATE: &str = "payment_update";
/// Event type of an entry recording a failed or anomalous callback.
pub const EVENT_PAYMENT_UPDATE_ERROR: &str = "payment_update_error";

/// One audit entry per inbound gateway callback. Append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookLog {
    pub id: Uuid,
    pub event_type: CompactString,
    /// Raw callback payload as received.
    pub payload: serde_json::Value,
    pub status_code: i32,
    pub error_message: Option<String>,
    pub received_at: OffsetDateTime,
}

/// Data for appending an audit entry.
#[derive(Debug, Clone)]
pub struct WebhookLogInsert {
    pub event_type: CompactString,
    pub payload: serde_json::Value,
    pub status_code: i32,
    pub error_message: Option<String>,
}

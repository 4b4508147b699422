//! Gateway callback payloads for payment status updates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PaymentStatus;

/// Callback sent by the payment gateway after a payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Gateway-side status code for the callback itself.
    pub status: i32,
    pub order_info: WebhookOrderInfo,
}

/// Order details carried inside a gateway callback.
///
/// Two field names are misspelled on the wire (`payemnt_details`,
/// `Payment_message`). The gateway emits them that way, so the renames
/// below are load-bearing and must not be fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookOrderInfo {
    /// Merchant-side order identifier (`ORD_...`).
    pub order_id: String,
    pub order_amount: Decimal,
    pub transaction_amount: Decimal,
    pub gateway: String,
    pub bank_reference: String,
    pub status: PaymentStatus,
    pub payment_mode: String,
    #[serde(rename = "payemnt_details")]
    pub payment_details: String,
    #[serde(rename = "Payment_message")]
    pub payment_message: String,
    /// Timestamp of the payment as a raw string. Parsed downstream so
    /// a malformed value is recorded as a failed update instead of
    /// being rejected at the transport layer.
    pub payment_time: String,
    pub error_message: String,
}

/// Acknowledgement body returned to the gateway.
///
/// Always paired with HTTP 200 so the gateway never retries; the
/// `success` flag carries the actual outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

//! HTTP client for the external payment gateway's collect API.
//!
//! The client is built once at startup from a validated
//! [`GatewayConfig`] and shared by every creation request. Calls are
//! bounded: a fixed request timeout plus one retry on failures that
//! never reached the gateway. Application-level rejections are never
//! retried, so the gateway sees each collect request at most twice and
//! each accepted request exactly once.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use edupay_sdk::objects::StudentInfo;

use crate::config::GatewayConfig;

/// Per-request timeout on collect calls.
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Errors from a collect-request call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network-level failure (connect, timeout, transport) with the
    /// retry budget spent. The gateway may or may not have seen the
    /// request.
    #[error("payment gateway unavailable: {0}")]
    Unavailable(reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("payment gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A success status whose body could not be read as JSON.
    #[error("payment gateway returned a malformed response: {0}")]
    InvalidResponse(reqwest::Error),
}

/// Body sent to the collect endpoint.
#[derive(Debug, Serialize)]
struct CollectRequest<'a> {
    merchant_key: &'a str,
    order_id: &'a str,
    amount: Decimal,
    student_info: &'a StudentInfo,
    gateway: &'a str,
}

/// Parsed gateway response to a collect request.
///
/// `payment_url` and `redirect_url` are plucked from the body when
/// present; the gateway is free to omit either. The full body is kept
/// for diagnostics and echoed back to the caller.
#[derive(Debug, Clone)]
pub struct CollectResponse {
    pub payment_url: Option<String>,
    pub redirect_url: Option<String>,
    pub raw: Value,
}

pub struct GatewayClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            config,
        }
    }

    /// School every order created through this client belongs to.
    pub fn school_id(&self) -> &str {
        &self.config.school_id
    }

    /// Registers a payment intent with the gateway.
    ///
    /// `amount` is the transaction amount, the value the payer is
    /// actually charged.
    pub async fn create_collect_request(
        &self,
        custom_order_id: &str,
        amount: Decimal,
        student_info: &StudentInfo,
        gateway: &str,
    ) -> Result<CollectResponse, GatewayError> {
        let payload = CollectRequest {
            merchant_key: &self.config.merchant_key,
            order_id: custom_order_id,
            amount,
            student_info,
            gateway,
        };

        let response = match self.send(&payload).await {
            Ok(response) => response,
            Err(err) if err.is_timeout() || err.is_connect() => {
                tracing::warn!(
                    order_id = %custom_order_id,
                    error = %err,
                    "collect request failed before reaching the gateway, retrying once"
                );
                self.send(&payload).await.map_err(GatewayError::Unavailable)?
            }
            Err(err) => return Err(GatewayError::Unavailable(err)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body, status),
            });
        }

        let raw: Value = response.json().await.map_err(GatewayError::InvalidResponse)?;
        Ok(CollectResponse {
            payment_url: string_field(&raw, "payment_url"),
            redirect_url: string_field(&raw, "redirect_url"),
            raw,
        })
    }

    async fn send(&self, payload: &CollectRequest<'_>) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .post(self.config.create_collect_url.clone())
            .header("x-api-key", &self.config.api_key)
            .json(payload)
            .send()
            .await
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Picks the most specific failure text out of a rejection body: the
/// gateway's own `message` field when the body is JSON, the body text
/// otherwise, the HTTP reason phrase as a last resort.
fn rejection_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Some(message) = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|value| string_field(value, "message"))
    {
        return message;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_owned();
    }
    status
        .canonical_reason()
        .unwrap_or("request rejected")
        .to_owned()
}

//! Reconciliation of gateway status callbacks.

use std::sync::Arc;

use compact_str::CompactString;
use edupay_sdk::objects::webhook::{WebhookAck, WebhookPayload};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::entities::order_status::StatusUpdate;
use crate::entities::webhook_log::{
    EVENT_PAYMENT_UPDATE, EVENT_PAYMENT_UPDATE_ERROR, WebhookLogInsert,
};
use crate::store::PaymentStore;

const MSG_PROCESSED: &str = "Webhook processed successfully";
const MSG_ORDER_NOT_FOUND: &str = "Order not found";
const MSG_PROCESSING_FAILED: &str = "Webhook processing failed";

pub struct WebhookService {
    store: Arc<dyn PaymentStore>,
}

enum Applied {
    Updated,
    OrderNotFound,
}

impl WebhookService {
    pub fn new(store: Arc<dyn PaymentStore>) -> Self {
        Self { store }
    }

    /// Applies a gateway callback to the owning order's status row.
    ///
    /// Infallible by signature: the outcome lives in the ack envelope
    /// and the transport acknowledges with 200 no matter what, so the
    /// gateway is never handed a transport error to retry on. Every
    /// callback is appended to the audit log before anything else;
    /// that entry is the durable trace when the update itself fails.
    ///
    /// Updates are last-writer-wins with no ordering check against the
    /// callback's `payment_time`, so a stale retransmission arriving
    /// after a newer callback regresses the stored status. Known
    /// correctness gap, kept for compatibility with the gateway's
    /// existing delivery behavior.
    pub async fn handle(&self, payload: WebhookPayload) -> WebhookAck {
        let raw = serde_json::to_value(&payload).unwrap_or(serde_json::Value::Null);

        if let Err(err) = self
            .store
            .insert_webhook_log(WebhookLogInsert {
                event_type: CompactString::const_new(EVENT_PAYMENT_UPDATE),
                payload: raw.clone(),
                status_code: payload.status,
                error_message: None,
            })
            .await
        {
            tracing::error!(error = %err, "failed to record webhook receipt");
            return self.report_failure(raw, err.to_string()).await;
        }

        match self.apply(&payload).await {
            Ok(Applied::Updated) => WebhookAck {
                success: true,
                message: MSG_PROCESSED.to_owned(),
                order_id: Some(payload.order_info.order_id),
            },
            Ok(Applied::OrderNotFound) => {
                tracing::error!(
                    order_id = %payload.order_info.order_id,
                    "webhook references an unknown order"
                );
                WebhookAck {
                    success: false,
                    message: MSG_ORDER_NOT_FOUND.to_owned(),
                    order_id: None,
                }
            }
            Err(message) => {
                tracing::error!(
                    order_id = %payload.order_info.order_id,
                    error = %message,
                    "webhook processing failed"
                );
                self.report_failure(raw, message).await
            }
        }
    }

    async fn apply(&self, payload: &WebhookPayload) -> Result<Applied, String> {
        let info = &payload.order_info;

        let Some(order) = self
            .store
            .find_order_by_custom_id(&info.order_id)
            .await
            .map_err(|err| err.to_string())?
        else {
            return Ok(Applied::OrderNotFound);
        };

        let payment_time = OffsetDateTime::parse(&info.payment_time, &Rfc3339)
            .map_err(|err| format!("invalid payment_time `{}`: {err}", info.payment_time))?;

        let updated = self
            .store
            .update_status(
                order.collect_id,
                StatusUpdate {
                    order_amount: info.order_amount,
                    transaction_amount: info.transaction_amount,
                    payment_mode: CompactString::from(info.payment_mode.as_str()),
                    payment_details: info.payment_details.clone(),
                    bank_reference: info.bank_reference.clone(),
                    payment_message: info.payment_message.clone(),
                    status: info.status.clone(),
                    error_message: info.error_message.clone(),
                    payment_time,
                },
            )
            .await
            .map_err(|err| err.to_string())?;

        if updated {
            tracing::info!(
                order_id = %info.order_id,
                status = %info.status,
                "transaction updated"
            );
        } else {
            // Unreachable while creation always writes the status row.
            // The ack still reports success; the warning is the only
            // place the condition shows up.
            tracing::warn!(
                order_id = %info.order_id,
                collect_id = %order.collect_id,
                "order has no status row to update"
            );
        }
        Ok(Applied::Updated)
    }

    /// Appends the error audit entry and builds the failure ack. The
    /// append is best-effort; if even that fails the ack alone carries
    /// the outcome.
    async fn report_failure(&self, raw: serde_json::Value, message: String) -> WebhookAck {
        if let Err(err) = self
            .store
            .insert_webhook_log(WebhookLogInsert {
                event_type: CompactString::const_new(EVENT_PAYMENT_UPDATE_ERROR),
                payload: raw,
                status_code: 500,
                error_message: Some(message),
            })
            .await
        {
            tracing::error!(error = %err, "failed to record webhook error entry");
        }
        WebhookAck {
            success: false,
            message: MSG_PROCESSING_FAILED.to_owned(),
            order_id: None,
        }
    }
}

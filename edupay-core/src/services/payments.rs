//! Order creation.

use std::sync::Arc;

use compact_str::CompactString;
use edupay_sdk::objects::create_payment::{
    CreatePaymentRequest, CreatePaymentResponse, ValidationError,
};
use uuid::Uuid;

use crate::entities::order::OrderInsert;
use crate::entities::order_status::OrderStatus;
use crate::gateway::{GatewayClient, GatewayError};
use crate::ids::generate_custom_order_id;
use crate::store::{PaymentStore, StoreError};

/// Failures on the creation path. All of them surface to the caller as
/// one synthesized message; see [`PaymentError::client_message`].
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl PaymentError {
    /// The user-visible failure text: the gateway's own message when it
    /// reported one, otherwise the underlying failure's message.
    pub fn client_message(&self) -> String {
        match self {
            PaymentError::Gateway(GatewayError::Rejected { message, .. }) => message.clone(),
            other => other.to_string(),
        }
    }
}

pub struct PaymentService {
    store: Arc<dyn PaymentStore>,
    gateway: GatewayClient,
}

impl PaymentService {
    pub fn new(store: Arc<dyn PaymentStore>, gateway: GatewayClient) -> Self {
        Self { store, gateway }
    }

    /// Creates an order with its initial `pending` status row, then
    /// registers the collect request with the gateway.
    ///
    /// Both rows are written before the gateway call and stay in place
    /// if it fails: a creation that died at the gateway is visible as a
    /// `pending` order, recoverable out of band, rather than lost.
    /// There is no transaction across the two inserts; a status insert
    /// failure leaves the order orphaned and fails the request without
    /// calling the gateway.
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<CreatePaymentResponse, PaymentError> {
        request.validate()?;

        let custom_order_id = generate_custom_order_id();
        let collect_id = Uuid::now_v7();

        self.store
            .insert_order(OrderInsert {
                collect_id,
                school_id: self.gateway.school_id().to_owned(),
                trustee_id: request.trustee_id,
                student_info: request.student_info.clone(),
                gateway_name: request.gateway_name.clone(),
                custom_order_id: custom_order_id.clone(),
            })
            .await?;

        self.store
            .insert_status(OrderStatus::pending(
                collect_id,
                request.order_amount,
                request.transaction_amount,
                CompactString::from(request.payment_mode.as_str()),
            ))
            .await?;

        tracing::info!(
            order_id = %custom_order_id,
            collect_id = %collect_id,
            gateway = %request.gateway_name,
            "order persisted, requesting collect"
        );

        let collect = self
            .gateway
            .create_collect_request(
                &custom_order_id,
                request.transaction_amount,
                &request.student_info,
                &request.gateway_name,
            )
            .await?;

        Ok(CreatePaymentResponse {
            success: true,
            message: "Payment request created successfully".to_owned(),
            order_id: custom_order_id,
            collect_id,
            payment_url: collect.payment_url,
            redirect_url: collect.redirect_url,
            raw_response: collect.raw,
        })
    }
}

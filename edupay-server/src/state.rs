//! Application state shared across all request handlers.

use edupay_core::gateway::GatewayClient;
use edupay_core::services::payments::PaymentService;
use edupay_core::services::seeder::SeederService;
use edupay_core::services::transactions::TransactionService;
use edupay_core::services::webhooks::WebhookService;
use edupay_core::store::PaymentStore;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Order creation against the external gateway.
    pub payments: Arc<PaymentService>,
    /// Reconciliation of gateway status callbacks.
    pub webhooks: Arc<WebhookService>,
    /// Transaction listings and status lookups.
    pub transactions: Arc<TransactionService>,
    /// Demo-data seeding for an empty store.
    pub seeder: Arc<SeederService>,
}

impl AppState {
    /// Wire all services onto one store and one gateway client.
    pub fn new(store: Arc<dyn PaymentStore>, gateway: GatewayClient) -> Self {
        Self {
            payments: Arc::new(PaymentService::new(store.clone(), gateway)),
            webhooks: Arc::new(WebhookService::new(store.clone())),
            transactions: Arc::new(TransactionService::new(store.clone())),
            seeder: Arc::new(SeederService::new(store)),
        }
    }
}

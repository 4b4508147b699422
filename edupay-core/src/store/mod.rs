//! Persistence layer: one trait, a Postgres backend, and an in-memory
//! backend for tests and local runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use edupay_sdk::objects::transactions::SortDirection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::TransactionRecord;
use crate::entities::order::{Order, OrderInsert};
use crate::entities::order_status::{OrderStatus, StatusUpdate};
use crate::entities::webhook_log::WebhookLogInsert;

/// Errors surfaced by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique-constraint violation on the externally-visible order id.
    #[error("an order with custom_order_id `{0}` already exists")]
    DuplicateOrderId(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Filter predicates for transaction listings. Empty sets and `None`
/// bounds mean "no constraint", never "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Status values matched verbatim against the status row.
    pub statuses: Vec<String>,
    pub school_ids: Vec<String>,
    /// Inclusive lower bound on payment time.
    pub payment_time_from: Option<OffsetDateTime>,
    /// Inclusive upper bound on payment time.
    pub payment_time_to: Option<OffsetDateTime>,
}

/// Columns a listing may be sorted by. Callers send free-form field
/// names; anything outside this set degrades to store-default order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    PaymentTime,
    OrderAmount,
    TransactionAmount,
    Status,
    CustomOrderId,
    SchoolId,
    Gateway,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "payment_time" => Some(SortField::PaymentTime),
            "order_amount" => Some(SortField::OrderAmount),
            "transaction_amount" => Some(SortField::TransactionAmount),
            "status" => Some(SortField::Status),
            "custom_order_id" => Some(SortField::CustomOrderId),
            "school_id" => Some(SortField::SchoolId),
            "gateway" | "gateway_name" => Some(SortField::Gateway),
            _ => None,
        }
    }
}

/// Requested ordering. `field: None` records that the caller named an
/// unknown column; rows then come back in store-default order, which
/// both backends define as ascending internal order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            field: Some(SortField::PaymentTime),
            direction: SortDirection::Desc,
        }
    }
}

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Storage operations behind the payment, reconciliation, and query
/// services.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Persists a new order. The uniqueness constraint on
    /// `custom_order_id` is the only defence against concurrent
    /// creation races; there is no application-level locking.
    async fn insert_order(&self, order: OrderInsert) -> Result<(), StoreError>;

    /// Writes a full status snapshot for an order.
    async fn insert_status(&self, status: OrderStatus) -> Result<(), StoreError>;

    async fn find_order_by_custom_id(
        &self,
        custom_order_id: &str,
    ) -> Result<Option<Order>, StoreError>;

    /// Overwrites the status row of `collect_id`. Returns whether a
    /// row was updated; a missing row is reported, not an error.
    async fn update_status(
        &self,
        collect_id: Uuid,
        update: StatusUpdate,
    ) -> Result<bool, StoreError>;

    /// Appends an audit entry. Entries are never updated or deleted.
    async fn insert_webhook_log(&self, log: WebhookLogInsert) -> Result<(), StoreError>;

    /// One page of joined order/status rows plus the total number of
    /// rows matching the filter.
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        sort: SortSpec,
        page: Page,
    ) -> Result<(Vec<TransactionRecord>, u64), StoreError>;

    /// The joined row for one externally-visible order id.
    async fn find_transaction(
        &self,
        custom_order_id: &str,
    ) -> Result<Option<TransactionRecord>, StoreError>;

    async fn count_orders(&self) -> Result<u64, StoreError>;
}

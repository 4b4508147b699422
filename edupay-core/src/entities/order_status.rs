use compact_str::CompactString;
use edupay_sdk::objects::PaymentStatus;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

/// Settlement state of an order. Exactly one row per order, written
/// at creation and afterwards only overwritten by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatus {
    pub collect_id: Uuid,
    pub order_amount: Decimal,
    pub transaction_amount: Decimal,
    pub payment_mode: CompactString,
    pub payment_details: Option<String>,
    pub bank_reference: Option<String>,
    pub payment_message: Option<String>,
    pub status: PaymentStatus,
    pub error_message: Option<String>,
    pub payment_time: OffsetDateTime,
}

impl OrderStatus {
    /// Initial snapshot written alongside a new order.
    pub fn pending(
        collect_id: Uuid,
        order_amount: Decimal,
        transaction_amount: Decimal,
        payment_mode: CompactString,
    ) -> Self {
        OrderStatus {
            collect_id,
            order_amount,
            transaction_amount,
            payment_mode,
            payment_details: None,
            bank_reference: None,
            payment_message: None,
            status: PaymentStatus::Pending,
            error_message: None,
            payment_time: OffsetDateTime::now_utc(),
        }
    }
}

/// Field set a reconciled callback applies to the status row.
///
/// Every field comes from the callback; the update is a full overwrite
/// of the previous snapshot, whatever order callbacks arrive in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub order_amount: Decimal,
    pub transaction_amount: Decimal,
    pub payment_mode: CompactString,
    pub payment_details: String,
    pub bank_reference: String,
    pub payment_message: String,
    pub status: PaymentStatus,
    pub error_message: String,
    pub payment_time: OffsetDateTime,
}

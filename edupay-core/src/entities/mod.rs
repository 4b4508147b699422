pub mod order;
pub mod order_status;
pub mod webhook_log;

use edupay_sdk::objects::transactions::{TransactionStatusView, TransactionView};

use crate::entities::order::Order;
use crate::entities::order_status::OrderStatus;

/// An order joined with its status row, as produced by listings and
/// single-order lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub order: Order,
    pub status: OrderStatus,
}

impl From<TransactionRecord> for TransactionView {
    fn from(record: TransactionRecord) -> Self {
        TransactionView {
            collect_id: record.order.collect_id,
            school_id: record.order.school_id,
            gateway: record.order.gateway_name,
            order_amount: record.status.order_amount,
            transaction_amount: record.status.transaction_amount,
            status: record.status.status,
            custom_order_id: record.order.custom_order_id,
            payment_time: record.status.payment_time,
            payment_mode: record.status.payment_mode,
            bank_reference: record.status.bank_reference,
            student_info: record.order.student_info,
        }
    }
}

impl From<TransactionRecord> for TransactionStatusView {
    fn from(record: TransactionRecord) -> Self {
        TransactionStatusView {
            custom_order_id: record.order.custom_order_id,
            status: record.status.status,
            order_amount: record.status.order_amount,
            transaction_amount: record.status.transaction_amount,
            payment_mode: record.status.payment_mode,
            payment_details: record.status.payment_details,
            bank_reference: record.status.bank_reference,
            payment_message: record.status.payment_message,
            payment_time: record.status.payment_time,
            error_message: record.status.error_message,
        }
    }
}

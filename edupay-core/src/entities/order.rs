use edupay_sdk::objects::StudentInfo;
use uuid::Uuid;

/// A payment order as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Internal order ID, shared with the status row.
    pub collect_id: Uuid,
    pub school_id: String,
    pub trustee_id: String,
    pub student_info: StudentInfo,
    pub gateway_name: String,
    /// Externally-visible identifier (`ORD_...`), unique across orders.
    pub custom_order_id: String,
    pub created_at: time::OffsetDateTime,
}

/// Data for inserting a new order.
#[derive(Debug, Clone)]
pub struct OrderInsert {
    pub collect_id: Uuid,
    pub school_id: String,
    pub trustee_id: String,
    pub student_info: StudentInfo,
    pub gateway_name: String,
    pub custom_order_id: String,
}

//! Response objects for the transaction listing and status endpoints.

use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{PaymentStatus, StudentInfo};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_SORT_FIELD: &str = "payment_time";

/// Sort direction for transaction listings. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = UnknownSortDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(UnknownSortDirection),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("sort direction must be `asc` or `desc`")]
pub struct UnknownSortDirection;

/// One row of a transaction listing: the order joined with its latest
/// status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionView {
    /// Internal order ID (UUID).
    pub collect_id: Uuid,
    pub school_id: String,
    pub gateway: String,
    pub order_amount: Decimal,
    pub transaction_amount: Decimal,
    pub status: PaymentStatus,
    pub custom_order_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub payment_time: OffsetDateTime,
    pub payment_mode: CompactString,
    pub bank_reference: Option<String>,
    pub student_info: StudentInfo,
}

/// Status projection for a single order, keyed by its merchant-side ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatusView {
    pub custom_order_id: String,
    pub status: PaymentStatus,
    pub order_amount: Decimal,
    pub transaction_amount: Decimal,
    pub payment_mode: CompactString,
    pub payment_details: Option<String>,
    pub bank_reference: Option<String>,
    pub payment_message: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub payment_time: OffsetDateTime,
    pub error_message: Option<String>,
}

/// Pagination block attached to every listing response.
///
/// Keys are camelCase on the wire, unlike the snake_case rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: u32, limit: u32, total_count: u64) -> Self {
        let limit = u64::from(limit.max(1));
        let total_pages = u32::try_from(total_count.div_ceil(limit)).unwrap_or(u32::MAX);
        PaginationMeta {
            current_page: page,
            total_pages,
            total_count,
            has_next: u64::from(page) * limit < total_count,
            has_prev: page > 1,
        }
    }
}

/// A page of transactions plus its pagination block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionView>,
    pub pagination: PaginationMeta,
}

/// Applies listing defaults and bounds: pages start at 1 and the page
/// size is capped at [`MAX_LIMIT`].
pub fn clamp_pagination(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    (page, limit)
}

//! Transaction listings and single-order status lookups.

use std::sync::Arc;

use edupay_sdk::objects::transactions::{
    PaginationMeta, SortDirection, TransactionPage, TransactionStatusView, TransactionView,
    clamp_pagination,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::store::{Page, PaymentStore, SortField, SortSpec, StoreError, TransactionFilter};

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Single-record lookup for an unknown order id. Distinct from the
    /// paginated query's empty page, which is not an error.
    #[error("Transaction not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Listing parameters as the caller sent them: nothing here has been
/// validated or defaulted yet. Dates arrive as raw strings because the
/// dashboard sends date-only values and other clients send RFC 3339;
/// both are accepted, and an unparseable bound degrades to
/// unconstrained instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortDirection>,
    pub statuses: Vec<String>,
    pub school_ids: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub struct TransactionService {
    store: Arc<dyn PaymentStore>,
}

impl TransactionService {
    pub fn new(store: Arc<dyn PaymentStore>) -> Self {
        Self { store }
    }

    /// One page of order ⋈ status rows matching the query's filters.
    pub async fn list(
        &self,
        query: TransactionListQuery,
    ) -> Result<TransactionPage, TransactionError> {
        let (page, limit) = clamp_pagination(query.page, query.limit);

        let sort = SortSpec {
            // A sort name outside the known column set degrades to
            // store-default order rather than failing.
            field: match &query.sort {
                Some(name) => SortField::parse(name),
                None => Some(SortField::PaymentTime),
            },
            direction: query.order.unwrap_or_default(),
        };

        let filter = TransactionFilter {
            statuses: query.statuses,
            school_ids: query.school_ids,
            payment_time_from: query.start_date.as_deref().and_then(parse_date_bound),
            payment_time_to: query.end_date.as_deref().and_then(parse_date_bound),
        };

        let (records, total) = self
            .store
            .list_transactions(&filter, sort, Page { page, limit })
            .await?;

        Ok(TransactionPage {
            transactions: records.into_iter().map(TransactionView::from).collect(),
            pagination: PaginationMeta::new(page, limit, total),
        })
    }

    /// The general listing pinned to a single school.
    pub async fn list_by_school(
        &self,
        school_id: &str,
        mut query: TransactionListQuery,
    ) -> Result<TransactionPage, TransactionError> {
        query.school_ids = vec![school_id.to_owned()];
        self.list(query).await
    }

    /// Full status detail for one externally-visible order id.
    pub async fn status(
        &self,
        custom_order_id: &str,
    ) -> Result<TransactionStatusView, TransactionError> {
        let record = self
            .store
            .find_transaction(custom_order_id)
            .await?
            .ok_or(TransactionError::NotFound)?;
        Ok(record.into())
    }
}

/// Parses a payment-time bound: RFC 3339, or a bare `YYYY-MM-DD` taken
/// as midnight UTC. Anything else is dropped.
fn parse_date_bound(value: &str) -> Option<OffsetDateTime> {
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }
    let date_only = format_description!("[year]-[month]-[day]");
    match time::Date::parse(value, &date_only) {
        Ok(date) => Some(date.midnight().assume_utc()),
        Err(_) => {
            tracing::debug!(value, "unparseable date bound ignored");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn date_bound_accepts_rfc3339() {
        assert_eq!(
            parse_date_bound("2025-04-23T08:14:21.945Z"),
            Some(datetime!(2025-04-23 08:14:21.945 UTC))
        );
    }

    #[test]
    fn date_bound_accepts_date_only_as_midnight_utc() {
        assert_eq!(
            parse_date_bound("2025-01-15"),
            Some(datetime!(2025-01-15 00:00:00 UTC))
        );
    }

    #[test]
    fn date_bound_drops_garbage() {
        assert_eq!(parse_date_bound("next tuesday"), None);
        assert_eq!(parse_date_bound(""), None);
    }
}

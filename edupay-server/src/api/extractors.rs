//! Custom Axum extractors for the transaction listing endpoints.
//!
//! The dashboard sends its membership filters as repeated query keys
//! (`status=success&status=pending`), which `axum::extract::Query`
//! collapses to a single value. [`ListParams`] walks the raw query
//! string with `url::form_urlencoded` instead and keeps every
//! occurrence.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use edupay_core::services::transactions::TransactionListQuery;
use edupay_sdk::objects::transactions::SortDirection;
use std::convert::Infallible;

/// Listing parameters drawn from the URL query string.
///
/// Extraction never rejects the request: a non-numeric page, an
/// unknown sort direction, or any other malformed value falls back to
/// its default, and unrecognized keys are ignored.
pub struct ListParams(pub TransactionListQuery);

impl<S: Send + Sync> FromRequestParts<S> for ListParams {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        Ok(ListParams(parse_query(query)))
    }
}

fn parse_query(query: &str) -> TransactionListQuery {
    let mut params = TransactionListQuery::default();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "page" => params.page = value.parse().ok(),
            "limit" => params.limit = value.parse().ok(),
            "sort" => params.sort = Some(value.into_owned()),
            "order" => params.order = value.parse::<SortDirection>().ok(),
            "status" => params.statuses.push(value.into_owned()),
            "school_id" => params.school_ids.push(value.into_owned()),
            "startDate" => params.start_date = Some(value.into_owned()),
            "endDate" => params.end_date = Some(value.into_owned()),
            _ => {}
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_accumulate() {
        let params =
            parse_query("status=success&status=pending&school_id=a&school_id=b&page=2&limit=25");
        assert_eq!(params.statuses, vec!["success", "pending"]);
        assert_eq!(params.school_ids, vec!["a", "b"]);
        assert_eq!(params.page, Some(2));
        assert_eq!(params.limit, Some(25));
    }

    #[test]
    fn dashboard_query_string_parses_fully() {
        let params = parse_query(
            "page=1&limit=10&sort=payment_time&order=desc&startDate=2025-01-01&endDate=2025-01-31",
        );
        assert_eq!(params.sort.as_deref(), Some("payment_time"));
        assert_eq!(params.order, Some(SortDirection::Desc));
        assert_eq!(params.start_date.as_deref(), Some("2025-01-01"));
        assert_eq!(params.end_date.as_deref(), Some("2025-01-31"));
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let params = parse_query("page=two&limit=-5&order=DESCENDING&ignored=x");
        assert_eq!(params.page, None);
        assert_eq!(params.limit, None);
        assert_eq!(params.order, None);
        assert!(params.statuses.is_empty());
    }

    #[test]
    fn percent_encoded_values_are_decoded() {
        let params = parse_query("startDate=2025-01-01T00%3A00%3A00Z");
        assert_eq!(params.start_date.as_deref(), Some("2025-01-01T00:00:00Z"));
    }
}

//! In-memory backend for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use edupay_sdk::objects::transactions::SortDirection;
use parking_lot::RwLock;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::TransactionRecord;
use crate::entities::order::{Order, OrderInsert};
use crate::entities::order_status::{OrderStatus, StatusUpdate};
use crate::entities::webhook_log::{WebhookLog, WebhookLogInsert};
use crate::store::{Page, PaymentStore, SortField, SortSpec, StoreError, TransactionFilter};

#[derive(Default)]
struct Inner {
    orders: Vec<Order>,
    statuses: HashMap<Uuid, OrderStatus>,
    webhook_logs: Vec<WebhookLog>,
}

/// Everything lives behind one `RwLock`. Inserts take the write lock,
/// so the duplicate scan and the push are a single critical section;
/// that lock is this backend's uniqueness constraint.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Audit entries in insertion order. Test support.
    pub fn webhook_logs(&self) -> Vec<WebhookLog> {
        self.inner.read().webhook_logs.clone()
    }

    /// Current status snapshot of an order. Test support.
    pub fn status_of(&self, collect_id: Uuid) -> Option<OrderStatus> {
        self.inner.read().statuses.get(&collect_id).cloned()
    }
}

fn matches_filter(record: &TransactionRecord, filter: &TransactionFilter) -> bool {
    if !filter.statuses.is_empty()
        && !filter
            .statuses
            .iter()
            .any(|status| status == record.status.status.as_str())
    {
        return false;
    }
    if !filter.school_ids.is_empty()
        && !filter
            .school_ids
            .iter()
            .any(|school| *school == record.order.school_id)
    {
        return false;
    }
    if let Some(from) = filter.payment_time_from {
        if record.status.payment_time < from {
            return false;
        }
    }
    if let Some(to) = filter.payment_time_to {
        if record.status.payment_time > to {
            return false;
        }
    }
    true
}

fn sort_records(records: &mut [TransactionRecord], sort: SortSpec) {
    let Some(field) = sort.field else {
        records.sort_by(|a, b| a.order.collect_id.cmp(&b.order.collect_id));
        return;
    };
    records.sort_by(|a, b| {
        let ordering = match field {
            SortField::PaymentTime => a.status.payment_time.cmp(&b.status.payment_time),
            SortField::OrderAmount => a.status.order_amount.cmp(&b.status.order_amount),
            SortField::TransactionAmount => a
                .status
                .transaction_amount
                .cmp(&b.status.transaction_amount),
            SortField::Status => a.status.status.as_str().cmp(b.status.status.as_str()),
            SortField::CustomOrderId => a.order.custom_order_id.cmp(&b.order.custom_order_id),
            SortField::SchoolId => a.order.school_id.cmp(&b.order.school_id),
            SortField::Gateway => a.order.gateway_name.cmp(&b.order.gateway_name),
        };
        let ordering = match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        // Ties break on internal id so pages never overlap.
        ordering.then_with(|| a.order.collect_id.cmp(&b.order.collect_id))
    });
}

#[async_trait]
impl PaymentStore for InMemoryStore {
    async fn insert_order(&self, order: OrderInsert) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner
            .orders
            .iter()
            .any(|existing| existing.custom_order_id == order.custom_order_id)
        {
            return Err(StoreError::DuplicateOrderId(order.custom_order_id));
        }
        inner.orders.push(Order {
            collect_id: order.collect_id,
            school_id: order.school_id,
            trustee_id: order.trustee_id,
            student_info: order.student_info,
            gateway_name: order.gateway_name,
            custom_order_id: order.custom_order_id,
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(())
    }

    async fn insert_status(&self, status: OrderStatus) -> Result<(), StoreError> {
        self.inner.write().statuses.insert(status.collect_id, status);
        Ok(())
    }

    async fn find_order_by_custom_id(
        &self,
        custom_order_id: &str,
    ) -> Result<Option<Order>, StoreError> {
        Ok(self
            .inner
            .read()
            .orders
            .iter()
            .find(|order| order.custom_order_id == custom_order_id)
            .cloned())
    }

    async fn update_status(
        &self,
        collect_id: Uuid,
        update: StatusUpdate,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        let Some(row) = inner.statuses.get_mut(&collect_id) else {
            return Ok(false);
        };
        row.order_amount = update.order_amount;
        row.transaction_amount = update.transaction_amount;
        row.payment_mode = update.payment_mode;
        row.payment_details = Some(update.payment_details);
        row.bank_reference = Some(update.bank_reference);
        row.payment_message = Some(update.payment_message);
        row.status = update.status;
        row.error_message = Some(update.error_message);
        row.payment_time = update.payment_time;
        Ok(true)
    }

    async fn insert_webhook_log(&self, log: WebhookLogInsert) -> Result<(), StoreError> {
        self.inner.write().webhook_logs.push(WebhookLog {
            id: Uuid::now_v7(),
            event_type: log.event_type,
            payload: log.payload,
            status_code: log.status_code,
            error_message: log.error_message,
            received_at: OffsetDateTime::now_utc(),
        });
        Ok(())
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        sort: SortSpec,
        page: Page,
    ) -> Result<(Vec<TransactionRecord>, u64), StoreError> {
        let inner = self.inner.read();
        let mut records: Vec<TransactionRecord> = inner
            .orders
            .iter()
            .filter_map(|order| {
                let status = inner.statuses.get(&order.collect_id)?;
                Some(TransactionRecord {
                    order: order.clone(),
                    status: status.clone(),
                })
            })
            .filter(|record| matches_filter(record, filter))
            .collect();
        drop(inner);

        sort_records(&mut records, sort);

        let total = records.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let rows = records
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .collect();
        Ok((rows, total))
    }

    async fn find_transaction(
        &self,
        custom_order_id: &str,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        let inner = self.inner.read();
        let Some(order) = inner
            .orders
            .iter()
            .find(|order| order.custom_order_id == custom_order_id)
        else {
            return Ok(None);
        };
        Ok(inner
            .statuses
            .get(&order.collect_id)
            .map(|status| TransactionRecord {
                order: order.clone(),
                status: status.clone(),
            }))
    }

    async fn count_orders(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().orders.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use compact_str::CompactString;
    use edupay_sdk::objects::{PaymentStatus, StudentInfo};
    use rust_decimal::Decimal;
    use time::macros::datetime;

    use super::*;

    fn order(n: u8, school_id: &str) -> OrderInsert {
        OrderInsert {
            collect_id: Uuid::from_u128(u128::from(n)),
            school_id: school_id.to_string(),
            trustee_id: "trustee".to_string(),
            student_info: StudentInfo {
                name: format!("Student {n}"),
                id: format!("STU{n:03}"),
                email: format!("student{n}@example.com"),
            },
            gateway_name: "PhonePe".to_string(),
            custom_order_id: format!("ORD_170406720{n}_abc{n:03}"),
        }
    }

    fn status(n: u8, value: &str, amount: i64) -> OrderStatus {
        OrderStatus {
            collect_id: Uuid::from_u128(u128::from(n)),
            order_amount: Decimal::from(amount),
            transaction_amount: Decimal::from(amount + 100),
            payment_mode: CompactString::from("upi"),
            payment_details: None,
            bank_reference: None,
            payment_message: None,
            status: PaymentStatus::from(value),
            error_message: None,
            payment_time: datetime!(2025-01-01 00:00:00 UTC) + time::Duration::hours(i64::from(n)),
        }
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        for (n, school, value, amount) in [
            (1u8, "school-a", "success", 1000),
            (2, "school-a", "pending", 3000),
            (3, "school-b", "success", 2000),
        ] {
            store.insert_order(order(n, school)).await.unwrap();
            store.insert_status(status(n, value, amount)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn rejects_duplicate_custom_order_id() {
        let store = InMemoryStore::new();
        store.insert_order(order(1, "school-a")).await.unwrap();
        let mut duplicate = order(2, "school-a");
        duplicate.custom_order_id = order(1, "school-a").custom_order_id;
        let err = store.insert_order(duplicate).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateOrderId(_)));
    }

    #[tokio::test]
    async fn filters_combine_conjunctively() {
        let store = seeded().await;
        let filter = TransactionFilter {
            statuses: vec!["success".to_string()],
            school_ids: vec!["school-a".to_string()],
            ..TransactionFilter::default()
        };
        let (rows, total) = store
            .list_transactions(&filter, SortSpec::default(), Page { page: 1, limit: 10 })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].order.school_id, "school-a");
        assert_eq!(rows[0].status.status, PaymentStatus::Success);
    }

    #[tokio::test]
    async fn default_sort_is_payment_time_desc() {
        let store = seeded().await;
        let (rows, _) = store
            .list_transactions(
                &TransactionFilter::default(),
                SortSpec::default(),
                Page { page: 1, limit: 10 },
            )
            .await
            .unwrap();
        let times: Vec<_> = rows.iter().map(|r| r.status.payment_time).collect();
        let mut sorted = times.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(times, sorted);
    }

    #[tokio::test]
    async fn unknown_sort_field_uses_internal_id_order() {
        let store = seeded().await;
        let (rows, _) = store
            .list_transactions(
                &TransactionFilter::default(),
                SortSpec {
                    field: None,
                    direction: SortDirection::Desc,
                },
                Page { page: 1, limit: 10 },
            )
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.order.collect_id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn pages_beyond_the_end_are_empty_but_keep_the_total() {
        let store = seeded().await;
        let (rows, total) = store
            .list_transactions(
                &TransactionFilter::default(),
                SortSpec::default(),
                Page { page: 5, limit: 2 },
            )
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn update_status_reports_missing_rows() {
        let store = seeded().await;
        let missing = Uuid::from_u128(99);
        let updated = store
            .update_status(
                missing,
                StatusUpdate {
                    order_amount: Decimal::from(1),
                    transaction_amount: Decimal::from(1),
                    payment_mode: CompactString::from("upi"),
                    payment_details: String::new(),
                    bank_reference: String::new(),
                    payment_message: String::new(),
                    status: PaymentStatus::Success,
                    error_message: String::new(),
                    payment_time: datetime!(2025-01-01 00:00:00 UTC),
                },
            )
            .await
            .unwrap();
        assert!(!updated);
    }
}

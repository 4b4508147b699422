//! Postgres backend.
//!
//! All queries are runtime-checked so the crate builds without a live
//! database. Listing queries are assembled with `QueryBuilder`; every
//! user-supplied value goes through a bind, and sort columns come from
//! a fixed mapping, never from caller input.

use async_trait::async_trait;
use compact_str::CompactString;
use edupay_sdk::objects::transactions::SortDirection;
use edupay_sdk::objects::{PaymentStatus, StudentInfo};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::TransactionRecord;
use crate::entities::order::{Order, OrderInsert};
use crate::entities::order_status::{OrderStatus, StatusUpdate};
use crate::entities::webhook_log::WebhookLogInsert;
use crate::store::{Page, PaymentStore, SortField, SortSpec, StoreError, TransactionFilter};

/// SQLSTATE for unique-constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    collect_id: Uuid,
    school_id: String,
    trustee_id: String,
    student_info: Json<StudentInfo>,
    gateway_name: String,
    custom_order_id: String,
    created_at: OffsetDateTime,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            collect_id: row.collect_id,
            school_id: row.school_id,
            trustee_id: row.trustee_id,
            student_info: row.student_info.0,
            gateway_name: row.gateway_name,
            custom_order_id: row.custom_order_id,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    collect_id: Uuid,
    school_id: String,
    trustee_id: String,
    student_info: Json<StudentInfo>,
    gateway_name: String,
    custom_order_id: String,
    created_at: OffsetDateTime,
    order_amount: Decimal,
    transaction_amount: Decimal,
    payment_mode: CompactString,
    payment_details: Option<String>,
    bank_reference: Option<String>,
    payment_message: Option<String>,
    status: String,
    error_message: Option<String>,
    payment_time: OffsetDateTime,
}

impl From<TransactionRow> for TransactionRecord {
    fn from(row: TransactionRow) -> Self {
        TransactionRecord {
            order: Order {
                collect_id: row.collect_id,
                school_id: row.school_id,
                trustee_id: row.trustee_id,
                student_info: row.student_info.0,
                gateway_name: row.gateway_name,
                custom_order_id: row.custom_order_id,
                created_at: row.created_at,
            },
            status: OrderStatus {
                collect_id: row.collect_id,
                order_amount: row.order_amount,
                transaction_amount: row.transaction_amount,
                payment_mode: row.payment_mode,
                payment_details: row.payment_details,
                bank_reference: row.bank_reference,
                payment_message: row.payment_message,
                status: PaymentStatus::from(row.status),
                error_message: row.error_message,
                payment_time: row.payment_time,
            },
        }
    }
}

const TRANSACTION_SELECT: &str = "\
    SELECT o.collect_id, o.school_id, o.trustee_id, o.student_info, \
           o.gateway_name, o.custom_order_id, o.created_at, \
           s.order_amount, s.transaction_amount, s.payment_mode, \
           s.payment_details, s.bank_reference, s.payment_message, \
           s.status, s.error_message, s.payment_time \
    FROM orders o \
    JOIN order_status s ON s.collect_id = o.collect_id";

const TRANSACTION_COUNT: &str = "\
    SELECT COUNT(*) \
    FROM orders o \
    JOIN order_status s ON s.collect_id = o.collect_id";

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a TransactionFilter) {
    let mut prefix = " WHERE ";
    if !filter.statuses.is_empty() {
        builder.push(prefix).push("s.status = ANY(");
        builder.push_bind(&filter.statuses).push(")");
        prefix = " AND ";
    }
    if !filter.school_ids.is_empty() {
        builder.push(prefix).push("o.school_id = ANY(");
        builder.push_bind(&filter.school_ids).push(")");
        prefix = " AND ";
    }
    if let Some(from) = filter.payment_time_from {
        builder.push(prefix).push("s.payment_time >= ");
        builder.push_bind(from);
        prefix = " AND ";
    }
    if let Some(to) = filter.payment_time_to {
        builder.push(prefix).push("s.payment_time <= ");
        builder.push_bind(to);
    }
}

fn order_by_clause(sort: SortSpec) -> String {
    let Some(field) = sort.field else {
        return " ORDER BY o.collect_id ASC".to_string();
    };
    let column = match field {
        SortField::PaymentTime => "s.payment_time",
        SortField::OrderAmount => "s.order_amount",
        SortField::TransactionAmount => "s.transaction_amount",
        SortField::Status => "s.status",
        SortField::CustomOrderId => "o.custom_order_id",
        SortField::SchoolId => "o.school_id",
        SortField::Gateway => "o.gateway_name",
    };
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    // Ties break on internal id so pages never overlap.
    format!(" ORDER BY {column} {direction}, o.collect_id ASC")
}

fn map_unique_violation(err: sqlx::Error, custom_order_id: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::DuplicateOrderId(custom_order_id.to_owned());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl PaymentStore for PgStore {
    #[tracing::instrument(skip_all, err, name = "SQL:InsertOrder")]
    async fn insert_order(&self, order: OrderInsert) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO orders
                (collect_id, school_id, trustee_id, student_info, gateway_name, custom_order_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.collect_id)
        .bind(&order.school_id)
        .bind(&order.trustee_id)
        .bind(Json(&order.student_info))
        .bind(&order.gateway_name)
        .bind(&order.custom_order_id)
        .execute(&self.pool)
        .await
        .map_err(|err| map_unique_violation(err, &order.custom_order_id))?;
        Ok(())
    }

    #[tracing::instrument(skip_all, err, name = "SQL:InsertOrderStatus")]
    async fn insert_status(&self, status: OrderStatus) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO order_status
                (collect_id, order_amount, transaction_amount, payment_mode,
                 payment_details, bank_reference, payment_message, status,
                 error_message, payment_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(status.collect_id)
        .bind(status.order_amount)
        .bind(status.transaction_amount)
        .bind(&status.payment_mode)
        .bind(&status.payment_details)
        .bind(&status.bank_reference)
        .bind(&status.payment_message)
        .bind(status.status.as_str())
        .bind(&status.error_message)
        .bind(status.payment_time)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, err, name = "SQL:FindOrderByCustomId")]
    async fn find_order_by_custom_id(
        &self,
        custom_order_id: &str,
    ) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT collect_id, school_id, trustee_id, student_info,
                   gateway_name, custom_order_id, created_at
            FROM orders
            WHERE custom_order_id = $1
            "#,
        )
        .bind(custom_order_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Order::from))
    }

    #[tracing::instrument(skip_all, err, name = "SQL:UpdateOrderStatus")]
    async fn update_status(
        &self,
        collect_id: Uuid,
        update: StatusUpdate,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE order_status SET
                order_amount = $2,
                transaction_amount = $3,
                payment_mode = $4,
                payment_details = $5,
                bank_reference = $6,
                payment_message = $7,
                status = $8,
                error_message = $9,
                payment_time = $10
            WHERE collect_id = $1
            "#,
        )
        .bind(collect_id)
        .bind(update.order_amount)
        .bind(update.transaction_amount)
        .bind(&update.payment_mode)
        .bind(&update.payment_details)
        .bind(&update.bank_reference)
        .bind(&update.payment_message)
        .bind(update.status.as_str())
        .bind(&update.error_message)
        .bind(update.payment_time)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, err, name = "SQL:InsertWebhookLog")]
    async fn insert_webhook_log(&self, log: WebhookLogInsert) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO webhook_logs (id, event_type, payload, status_code, error_message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&log.event_type)
        .bind(&log.payload)
        .bind(log.status_code)
        .bind(&log.error_message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, err, name = "SQL:ListTransactions")]
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        sort: SortSpec,
        page: Page,
    ) -> Result<(Vec<TransactionRecord>, u64), StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(TRANSACTION_SELECT);
        push_filters(&mut builder, filter);
        builder.push(order_by_clause(sort));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(page.limit));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows: Vec<TransactionRow> =
            builder.build_query_as().fetch_all(&self.pool).await?;

        let mut count_builder: QueryBuilder<Postgres> = QueryBuilder::new(TRANSACTION_COUNT);
        push_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((
            rows.into_iter().map(TransactionRecord::from).collect(),
            u64::try_from(total).unwrap_or(0),
        ))
    }

    #[tracing::instrument(skip_all, err, name = "SQL:FindTransaction")]
    async fn find_transaction(
        &self,
        custom_order_id: &str,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(TRANSACTION_SELECT);
        builder.push(" WHERE o.custom_order_id = ");
        builder.push_bind(custom_order_id);
        let row: Option<TransactionRow> =
            builder.build_query_as().fetch_optional(&self.pool).await?;
        Ok(row.map(TransactionRecord::from))
    }

    #[tracing::instrument(skip_all, err, name = "SQL:CountOrders")]
    async fn count_orders(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

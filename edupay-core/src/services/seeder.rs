//! Demo fixtures for an empty store, so the dashboard has something to
//! render before any real order exists.

use std::sync::Arc;

use compact_str::CompactString;
use edupay_sdk::objects::{PaymentStatus, StudentInfo};
use rust_decimal::Decimal;
use time::macros::datetime;
use uuid::Uuid;

use crate::entities::order::OrderInsert;
use crate::entities::order_status::OrderStatus;
use crate::store::{PaymentStore, StoreError};

/// Outcome of a seeding request, echoed to the caller verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded,
    AlreadyExists,
}

impl SeedOutcome {
    pub fn message(self) -> &'static str {
        match self {
            SeedOutcome::Seeded => "Dummy data seeded successfully",
            SeedOutcome::AlreadyExists => "Dummy data already exists",
        }
    }
}

pub struct SeederService {
    store: Arc<dyn PaymentStore>,
}

struct Fixture {
    school_id: &'static str,
    trustee_id: &'static str,
    student: (&'static str, &'static str, &'static str),
    gateway_name: &'static str,
    custom_order_id: &'static str,
    order_amount: i64,
    transaction_amount: i64,
    payment_mode: &'static str,
    payment_details: &'static str,
    bank_reference: &'static str,
    payment_message: &'static str,
    status: &'static str,
    payment_time: time::OffsetDateTime,
}

const FIXTURES: [Fixture; 3] = [
    Fixture {
        school_id: "65b0e6293e9f76a9694d84b4",
        trustee_id: "65b0e552dd31950a9b41c5ba",
        student: ("John Doe", "STU001", "john.doe@example.com"),
        gateway_name: "PhonePe",
        custom_order_id: "ORD_1704067200_abc123",
        order_amount: 2000,
        transaction_amount: 2200,
        payment_mode: "upi",
        payment_details: "success@ybl",
        bank_reference: "YESBNK222",
        payment_message: "Payment successful",
        status: "success",
        payment_time: datetime!(2025-01-15 08:14:21.945 UTC),
    },
    Fixture {
        school_id: "65b0e6293e9f76a9694d84b4",
        trustee_id: "65b0e552dd31950a9b41c5ba",
        student: ("Jane Smith", "STU002", "jane.smith@example.com"),
        gateway_name: "Razorpay",
        custom_order_id: "ORD_1704067260_def456",
        order_amount: 1500,
        transaction_amount: 1650,
        payment_mode: "card",
        payment_details: "card@1234",
        bank_reference: "HDFCBNK333",
        payment_message: "Payment successful",
        status: "success",
        payment_time: datetime!(2025-01-14 10:30:15.123 UTC),
    },
    Fixture {
        school_id: "65b0e6293e9f76a9694d84b5",
        trustee_id: "65b0e552dd31950a9b41c5bb",
        student: ("Mike Johnson", "STU003", "mike.johnson@example.com"),
        gateway_name: "Paytm",
        custom_order_id: "ORD_1704067320_ghi789",
        order_amount: 3000,
        transaction_amount: 3300,
        payment_mode: "netbanking",
        payment_details: "netbank@icici",
        bank_reference: "ICICIBNK444",
        payment_message: "Payment pending",
        status: "pending",
        payment_time: datetime!(2025-01-13 14:45:30.456 UTC),
    },
];

impl SeederService {
    pub fn new(store: Arc<dyn PaymentStore>) -> Self {
        Self { store }
    }

    /// Inserts the demo orders iff the store holds no orders at all;
    /// a store with any data is left untouched.
    pub async fn seed(&self) -> Result<SeedOutcome, StoreError> {
        if self.store.count_orders().await? > 0 {
            return Ok(SeedOutcome::AlreadyExists);
        }

        for fixture in &FIXTURES {
            let collect_id = Uuid::now_v7();
            let (name, id, email) = fixture.student;

            self.store
                .insert_order(OrderInsert {
                    collect_id,
                    school_id: fixture.school_id.to_owned(),
                    trustee_id: fixture.trustee_id.to_owned(),
                    student_info: StudentInfo {
                        name: name.to_owned(),
                        id: id.to_owned(),
                        email: email.to_owned(),
                    },
                    gateway_name: fixture.gateway_name.to_owned(),
                    custom_order_id: fixture.custom_order_id.to_owned(),
                })
                .await?;

            self.store
                .insert_status(OrderStatus {
                    collect_id,
                    order_amount: Decimal::from(fixture.order_amount),
                    transaction_amount: Decimal::from(fixture.transaction_amount),
                    payment_mode: CompactString::from(fixture.payment_mode),
                    payment_details: Some(fixture.payment_details.to_owned()),
                    bank_reference: Some(fixture.bank_reference.to_owned()),
                    payment_message: Some(fixture.payment_message.to_owned()),
                    status: PaymentStatus::from(fixture.status),
                    error_message: Some("NA".to_owned()),
                    payment_time: fixture.payment_time,
                })
                .await?;
        }

        tracing::info!(orders = FIXTURES.len(), "seeded demo transactions");
        Ok(SeedOutcome::Seeded)
    }
}

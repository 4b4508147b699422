use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::objects::StudentInfo;

/// Request payload for creating a new payment order.
///
/// Sent by the school dashboard to `POST /api/payment/create-payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub trustee_id: String,
    pub student_info: StudentInfo,
    pub gateway_name: String,
    pub order_amount: Decimal,
    pub transaction_amount: Decimal,
    pub payment_mode: String,
}

impl CreatePaymentRequest {
    /// Field-level validation, applied before the order is persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.trustee_id.trim().is_empty() {
            return Err(ValidationError::Empty("trustee_id"));
        }
        if self.student_info.name.trim().is_empty() {
            return Err(ValidationError::Empty("student_info.name"));
        }
        if self.student_info.id.trim().is_empty() {
            return Err(ValidationError::Empty("student_info.id"));
        }
        if self.student_info.email.trim().is_empty() {
            return Err(ValidationError::Empty("student_info.email"));
        }
        if !is_plausible_email(&self.student_info.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.gateway_name.trim().is_empty() {
            return Err(ValidationError::Empty("gateway_name"));
        }
        if self.order_amount < Decimal::ONE {
            return Err(ValidationError::BelowMinimum("order_amount"));
        }
        if self.transaction_amount < Decimal::ONE {
            return Err(ValidationError::BelowMinimum("transaction_amount"));
        }
        if self.payment_mode.trim().is_empty() {
            return Err(ValidationError::Empty("payment_mode"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} should not be empty")]
    Empty(&'static str),
    #[error("{0} must not be less than 1")]
    BelowMinimum(&'static str),
    #[error("student_info.email must be an email")]
    InvalidEmail,
}

fn is_plausible_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

/// Response returned by the "create payment" endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    pub success: bool,
    pub message: String,
    /// Merchant-side order identifier (`ORD_...`), used by gateway callbacks.
    pub order_id: String,
    /// Internal order ID (UUID).
    pub collect_id: Uuid,
    /// Hosted checkout page, when the gateway supplied one.
    pub payment_url: Option<String>,
    /// Post-payment redirect target, when the gateway supplied one.
    pub redirect_url: Option<String>,
    /// Gateway response body, passed through untouched.
    pub raw_response: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreatePaymentRequest {
        CreatePaymentRequest {
            trustee_id: "65b0e552dd31950a9b41c5ba".to_string(),
            student_info: StudentInfo {
                name: "John Doe".to_string(),
                id: "STU001".to_string(),
                email: "john.doe@example.com".to_string(),
            },
            gateway_name: "PhonePe".to_string(),
            order_amount: Decimal::from(2000),
            transaction_amount: Decimal::from(2200),
            payment_mode: "upi".to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_request() {
        assert_eq!(request().validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_trustee_id() {
        let mut req = request();
        req.trustee_id = "  ".to_string();
        assert_eq!(req.validate(), Err(ValidationError::Empty("trustee_id")));
    }

    #[test]
    fn rejects_malformed_email() {
        let mut req = request();
        req.student_info.email = "not-an-email".to_string();
        assert_eq!(req.validate(), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn rejects_amount_below_one() {
        let mut req = request();
        req.order_amount = Decimal::ZERO;
        assert_eq!(
            req.validate(),
            Err(ValidationError::BelowMinimum("order_amount"))
        );
    }

    #[test]
    fn optional_urls_serialize_as_null() {
        let response = CreatePaymentResponse {
            success: true,
            message: "Payment request created successfully".to_string(),
            order_id: "ORD_1704067200_abc123".to_string(),
            collect_id: Uuid::nil(),
            payment_url: None,
            redirect_url: None,
            raw_response: serde_json::json!({}),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["payment_url"], serde_json::Value::Null);
        assert_eq!(json["redirect_url"], serde_json::Value::Null);
    }
}

use chrono::{DateTime, Utc};
use risk_core::Verdict;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ===== Fraud Check Request =====
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct CheckRequest {
    #[validate(custom = "validate_amount")]
    pub amount: Decimal,

    #[validate(length(min = 1, max = 128))]
    pub merchant_name: String,

    #[validate(custom = "validate_card_number")]
    pub card_number: String,
}

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_not_positive"));
    }
    Ok(())
}

// Card numbers must reduce to 13-19 digits once separators are stripped
fn validate_card_number(card_number: &str) -> Result<(), ValidationError> {
    let digits = card_number.chars().filter(|c| c.is_ascii_digit()).count();
    if !(13..=19).contains(&digits) {
        return Err(ValidationError::new("invalid_card_number"));
    }
    Ok(())
}

// ===== Fraud Check Response =====
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub transaction_id: Uuid,
    #[serde(flatten)]
    pub verdict: Verdict,
}

// ===== Stored Transaction =====
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub merchant_name: String,
    pub card_number: String,
    pub transaction_date: DateTime<Utc>,
    pub is_fraudulent: bool,
    pub risk_level: String,
    pub fraud_indicators: Vec<String>,
}

// ===== Health Check =====
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

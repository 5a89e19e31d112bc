use crate::errors::ApiResult;
use crate::models::{CheckRequest, TransactionRecord};
use anyhow::Result;
use chrono::{DateTime, Utc};
use risk_core::Verdict;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use uuid::Uuid;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}

pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Persist a checked transaction together with its verdict; returns the new row id
pub async fn insert_transaction(
    pool: &PgPool,
    user_id: Uuid,
    request: &CheckRequest,
    verdict: &Verdict,
    evaluated_at: DateTime<Utc>,
) -> ApiResult<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO transactions
            (id, user_id, amount, merchant_name, card_number, transaction_date,
             is_fraudulent, risk_level, fraud_indicators)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(id)
    .bind(user_id)
    .bind(request.amount)
    .bind(&request.merchant_name)
    .bind(&request.card_number)
    .bind(evaluated_at)
    .bind(verdict.is_fraudulent)
    .bind(verdict.risk_level.as_str())
    .bind(&verdict.reasons)
    .execute(pool)
    .await?;

    Ok(id)
}

/// A user's checked transactions, newest first
pub async fn transactions_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> ApiResult<Vec<TransactionRecord>> {
    let transactions = sqlx::query_as::<_, TransactionRecord>(
        "SELECT id, user_id, amount, merchant_name, card_number, transaction_date,
                is_fraudulent, risk_level, fraud_indicators
         FROM transactions
         WHERE user_id = $1
         ORDER BY transaction_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(transactions)
}

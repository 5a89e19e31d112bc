use crate::database;
use crate::errors::ApiError;
use crate::metrics;
use crate::middleware::{AuthenticatedUser, JwtAuth};
use crate::models::{CheckRequest, CheckResponse, HealthResponse};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use risk_core::{RiskScorer, Transaction};
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;
use validator::Validate;

/// Instant the service came up, for uptime reporting
#[derive(Clone, Copy)]
pub struct ServiceStart(pub Instant);

// ===== Health Check =====
pub async fn health_check(
    pool: web::Data<PgPool>,
    start: web::Data<ServiceStart>,
) -> HttpResponse {
    let status = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => "healthy",
        Err(_) => "degraded",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: start.0.elapsed().as_secs(),
    })
}

// ===== Check Transaction =====
pub async fn check_transaction(
    req: web::Json<CheckRequest>,
    user: AuthenticatedUser,
    scorer: web::Data<Arc<RiskScorer>>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let request = req.into_inner();
    request
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let amount = request
        .amount
        .to_f64()
        .ok_or_else(|| ApiError::ValidationError("amount out of range".to_string()))?;

    // One clock read shared by the scorer and the stored record
    let evaluated_at = Utc::now();

    let verdict = scorer.evaluate(
        &Transaction {
            amount,
            merchant_name: request.merchant_name.clone(),
            card_number: request.card_number.clone(),
        },
        evaluated_at,
    );

    metrics::FRAUD_CHECKS_TOTAL.inc();
    metrics::RISK_SCORE_DISTRIBUTION.observe(verdict.risk_score);
    if verdict.is_fraudulent {
        metrics::FRAUD_FLAGGED_TOTAL
            .with_label_values(&[verdict.risk_level.as_str()])
            .inc();
    }

    let transaction_id =
        database::insert_transaction(&pool, user.user_id, &request, &verdict, evaluated_at)
            .await?;

    tracing::info!(
        %transaction_id,
        risk_score = verdict.risk_score,
        risk_level = verdict.risk_level.as_str(),
        is_fraudulent = verdict.is_fraudulent,
        "transaction checked"
    );

    Ok(HttpResponse::Ok().json(CheckResponse {
        transaction_id,
        verdict,
    }))
}

// ===== Transaction History =====
pub async fn list_transactions(
    path: web::Path<Uuid>,
    _user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    metrics::HISTORY_REQUESTS_TOTAL.inc();
    let transactions = database::transactions_for_user(&pool, user_id).await?;

    Ok(HttpResponse::Ok().json(transactions))
}

// ===== Prometheus Metrics =====
pub async fn metrics_endpoint() -> Result<HttpResponse, ApiError> {
    let body = metrics::metrics_handler().map_err(|e| ApiError::InternalError(e.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

// ===== Configure Routes =====
pub fn configure_routes(cfg: &mut web::ServiceConfig, auth: JwtAuth) {
    cfg.service(
        web::scope("/api/fraud")
            .wrap(auth)
            .route("/check", web::post().to(check_transaction))
            .route("/transactions/{user_id}", web::get().to(list_transactions)),
    )
    .route("/health", web::get().to(health_check))
    .route("/metrics", web::get().to(metrics_endpoint));
}

use actix_cors::Cors;
use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use dotenv::dotenv;
use fraud_api::{
    config::Config,
    database,
    handlers::{self, ServiceStart},
    metrics,
    middleware::{JwtAuth, RateLimiter},
};
use risk_core::{RiskRules, RiskScorer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .json()
        .init();

    info!("Starting Fraud API...");

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    info!("Configuration loaded successfully");

    // Rule tables are validated once here; evaluation never re-checks them
    let scorer = Arc::new(
        RiskScorer::new(RiskRules::default()).expect("Risk rule tables failed validation"),
    );

    metrics::register_metrics(prometheus::default_registry())
        .expect("Failed to register metrics");

    // Create database pool
    info!("Connecting to database at {}", config.database.url);
    let pool = match database::create_pool(&config.database.url, config.database.max_connections)
        .await
    {
        Ok(p) => {
            info!("Database connection pool created successfully");
            p
        }
        Err(e) => {
            error!("Failed to create database pool: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Database connection failed: {}", e),
            ));
        }
    };

    if let Err(e) = database::health_check(&pool).await {
        error!("Database health check failed: {}", e);
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "Database not accessible",
        ));
    }
    info!("Database health check passed");

    let server_config = config.server.clone();
    let jwt_secret = config.auth.jwt_secret.clone();
    let requests_per_minute = config.rate_limit.requests_per_minute;
    let start = ServiceStart(Instant::now());

    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        let jwt_secret = jwt_secret.clone();
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(scorer.clone()))
            .app_data(web::Data::new(start))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(actix_middleware::Logger::default())
            .wrap(RateLimiter::new(requests_per_minute))
            .configure(|cfg| handlers::configure_routes(cfg, JwtAuth::new(&jwt_secret)))
    })
    .workers(server_config.workers)
    .bind((server_config.host, server_config.port))?
    .run()
    .await
}

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    // Business metrics
    pub static ref FRAUD_CHECKS_TOTAL: IntCounter = IntCounter::new(
        "fraud_checks_total",
        "Total transactions evaluated"
    ).expect("metric can be created");

    pub static ref FRAUD_FLAGGED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("fraud_flagged_total", "Transactions flagged as fraudulent"),
        &["risk_level"]
    ).expect("metric can be created");

    pub static ref RISK_SCORE_DISTRIBUTION: Histogram = Histogram::with_opts(
        HistogramOpts::new("risk_score_distribution", "Distribution of combined risk scores")
            .buckets(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9])
    ).expect("metric can be created");

    pub static ref HISTORY_REQUESTS_TOTAL: IntCounter = IntCounter::new(
        "transaction_history_requests_total",
        "Total transaction history lookups"
    ).expect("metric can be created");
}

/// Register all metrics with the given registry
pub fn register_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(FRAUD_CHECKS_TOTAL.clone()))?;
    registry.register(Box::new(FRAUD_FLAGGED_TOTAL.clone()))?;
    registry.register(Box::new(RISK_SCORE_DISTRIBUTION.clone()))?;
    registry.register(Box::new(HISTORY_REQUESTS_TOTAL.clone()))?;
    Ok(())
}

/// Generate metrics output in Prometheus text format
pub fn metrics_handler() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let registry = Registry::new();
        let result = register_metrics(&registry);
        assert!(result.is_ok());
    }

    #[test]
    fn test_metrics_handler() {
        // Tolerate the other test having registered first
        let _ = register_metrics(prometheus::default_registry());
        FRAUD_CHECKS_TOTAL.inc();
        let output = metrics_handler().unwrap();
        assert!(output.contains("fraud_checks_total"));
    }
}

//! Risk scoring engine
//!
//! Four independent risk dimensions (merchant, amount, card, temporal)
//! combined into a weighted score, a fraud flag, a tier, and reasons.

use crate::card;
use crate::error::Result;
use crate::rules::RiskRules;
use crate::types::{
    CardFeatures, MerchantCategory, RiskBreakdown, RiskFactor, RiskLevel, Transaction, Verdict,
};
use chrono::{DateTime, Datelike, Timelike, Utc};
use tracing::debug;

/// Weight of the merchant dimension in the combined score
pub const MERCHANT_WEIGHT: f64 = 0.25;

/// Weight of the amount dimension in the combined score
pub const AMOUNT_WEIGHT: f64 = 0.30;

/// Weight of the card dimension in the combined score
pub const CARD_WEIGHT: f64 = 0.25;

/// Weight of the temporal dimension in the combined score
pub const TEMPORAL_WEIGHT: f64 = 0.20;

/// Combined scores at or above this are flagged as fraudulent
pub const FRAUD_THRESHOLD: f64 = 0.70;

/// Classify a merchant by name substring
///
/// Checked in a fixed precedence order; the first matching rule wins and
/// unmatched or empty names fall through to [`MerchantCategory::Unknown`].
pub fn classify_merchant(merchant_name: &str) -> MerchantCategory {
    let name = merchant_name.to_lowercase();

    if name.contains("bet") || name.contains("casino") {
        MerchantCategory::Gambling
    } else if name.contains("travel") || name.contains("air") {
        MerchantCategory::Travel
    } else if name.contains("shop") || name.contains("store") {
        MerchantCategory::OnlineRetail
    } else if name.contains("tech") || name.contains("electronics") {
        MerchantCategory::Electronics
    } else {
        MerchantCategory::Unknown
    }
}

/// Heuristic transaction-risk scorer
///
/// Stateless apart from the injected rule tables; a single instance is safe
/// to share across any number of threads.
pub struct RiskScorer {
    rules: RiskRules,
}

impl RiskScorer {
    /// Build a scorer over the given rule tables
    ///
    /// Fails if the tables violate a load-time invariant; evaluation never
    /// re-checks them.
    pub fn new(rules: RiskRules) -> Result<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    /// The rule tables this scorer evaluates against
    pub fn rules(&self) -> &RiskRules {
        &self.rules
    }

    /// Evaluate a transaction against the current wall clock
    ///
    /// The clock is read exactly once, here at the call boundary; all four
    /// dimensions see the same instant.
    pub fn evaluate_now(&self, transaction: &Transaction) -> Verdict {
        self.evaluate(transaction, Utc::now())
    }

    /// Evaluate a transaction at the given instant
    ///
    /// Total over its inputs: validation (amount positivity, card length
    /// bounds) is the caller's responsibility, and degenerate inputs yield
    /// degenerate but well-defined scores rather than a panic.
    pub fn evaluate(&self, transaction: &Transaction, at: DateTime<Utc>) -> Verdict {
        let hour = at.hour();
        let day_of_week = at.weekday().num_days_from_sunday();

        let category = classify_merchant(&transaction.merchant_name);

        // ===== 1. MERCHANT RISK (weight 0.25) =====
        let merchant_risk = self.merchant_risk(category, hour, day_of_week);

        // ===== 2. AMOUNT RISK (weight 0.30) =====
        let amount_risk = self.amount_risk(transaction.amount, category);

        // ===== 3. CARD RISK (weight 0.25) =====
        let features = card::extract_features(&transaction.card_number);
        let card_risk = self.card_risk(&features);

        // ===== 4. TEMPORAL RISK (weight 0.20) =====
        let temporal_risk = self.temporal_risk(hour, day_of_week);

        let factors = [
            RiskFactor {
                score: merchant_risk,
                weight: MERCHANT_WEIGHT,
            },
            RiskFactor {
                score: amount_risk,
                weight: AMOUNT_WEIGHT,
            },
            RiskFactor {
                score: card_risk,
                weight: CARD_WEIGHT,
            },
            RiskFactor {
                score: temporal_risk,
                weight: TEMPORAL_WEIGHT,
            },
        ];

        let risk_score: f64 = factors.iter().map(|f| f.score * f.weight).sum();

        let mut reasons = Vec::new();
        if merchant_risk > 0.6 {
            reasons.push(format!("High-risk merchant category: {category}"));
        }
        if amount_risk > 0.7 {
            reasons.push("Unusual transaction amount for this merchant type".to_string());
        }
        if features.checksum_failed {
            reasons.push("Invalid card number checksum".to_string());
        }
        if features.repetition_score > 0.5 {
            reasons.push("Suspicious digit patterns in card number".to_string());
        }
        if temporal_risk > 0.6 {
            reasons.push("Unusual transaction time".to_string());
        }

        // The flag and the tier read the unrounded score; only the reported
        // values are rounded.
        let is_fraudulent = risk_score >= FRAUD_THRESHOLD;
        let confidence = (1.0 - score_deviation(&factors)).max(0.5);

        debug!(
            merchant_risk,
            amount_risk, card_risk, temporal_risk, risk_score, "transaction scored"
        );

        Verdict {
            is_fraudulent,
            risk_level: RiskLevel::from_score(risk_score),
            risk_score: round2(risk_score),
            confidence: round2(confidence),
            reasons,
            analysis: RiskBreakdown {
                merchant_risk: round2(merchant_risk),
                amount_risk: round2(amount_risk),
                card_risk: round2(card_risk),
                temporal_risk: round2(temporal_risk),
            },
        }
    }

    /// Merchant-category risk at the given hour
    ///
    /// Baseline plus the category's night surcharge inside the night
    /// window, clamped to 1.0. The day of week is accepted but plays no
    /// part here; only the temporal dimension reads it.
    pub fn merchant_risk(
        &self,
        category: MerchantCategory,
        hour: u32,
        _day_of_week: u32,
    ) -> f64 {
        let profile = &self.rules.category(category).profile;

        let mut risk = profile.base_risk;
        if self.rules.time.is_night(hour) {
            risk += profile.night_surcharge;
        }

        risk.min(1.0)
    }

    /// Amount risk via piecewise linear interpolation against the
    /// category's threshold triple
    ///
    /// Flat 0.20 floor at or below `low`, then linear bands meeting at
    /// 0.50 and 0.80, with the excess above `high` capped so the output
    /// stays within [0.20, 1.00].
    pub fn amount_risk(&self, amount: f64, category: MerchantCategory) -> f64 {
        let t = &self.rules.category(category).thresholds;

        if amount > t.high {
            0.8 + ((amount - t.high) / (t.high * 2.0)).min(0.2)
        } else if amount > t.medium {
            0.5 + (amount - t.medium) / (t.high - t.medium) * 0.3
        } else if amount > t.low {
            0.3 + (amount - t.low) / (t.medium - t.low) * 0.2
        } else {
            0.2
        }
    }

    /// Card risk from the extracted feature vector
    ///
    /// Three independent boolean gates, not proportional contributions:
    /// unusual length, failed checksum, heavy digit repetition.
    pub fn card_risk(&self, features: &CardFeatures) -> f64 {
        let mut risk: f64 = 0.0;

        if features.length_score > 0.7 {
            risk += 0.3;
        }
        if features.checksum_failed {
            risk += 0.4;
        }
        if features.repetition_score > 0.5 {
            risk += 0.3;
        }

        risk.min(1.0)
    }

    /// Time-of-day and day-of-week risk
    pub fn temporal_risk(&self, hour: u32, day_of_week: u32) -> f64 {
        let mut risk: f64 = 0.0;

        if self.rules.time.is_night(hour) {
            risk += 0.3;
        }
        if self.rules.time.is_weekend(day_of_week) {
            risk += 0.2;
        }

        risk.min(1.0)
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        // The default tables are known-valid
        Self {
            rules: RiskRules::default(),
        }
    }
}

/// Population standard deviation of the raw dimension scores
///
/// Low dispersion means the dimensions agree, which the combiner reads as
/// higher confidence.
fn score_deviation(factors: &[RiskFactor]) -> f64 {
    let mean = factors.iter().map(|f| f.score).sum::<f64>() / factors.len() as f64;
    let variance = factors
        .iter()
        .map(|f| (f.score - mean).powi(2))
        .sum::<f64>()
        / factors.len() as f64;
    variance.sqrt()
}

/// Round to two decimal places for reporting
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

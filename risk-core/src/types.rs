//! Core types for the risk scorer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Merchant category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MerchantCategory {
    /// Online retail (shops, stores)
    OnlineRetail,
    /// Gambling and betting
    Gambling,
    /// Travel and airlines
    Travel,
    /// Electronics and technology
    Electronics,
    /// Anything that matched no other category
    Unknown,
}

impl MerchantCategory {
    /// Category name as it appears in rule tables and reasons
    pub fn as_str(&self) -> &'static str {
        match self {
            MerchantCategory::OnlineRetail => "online_retail",
            MerchantCategory::Gambling => "gambling",
            MerchantCategory::Travel => "travel",
            MerchantCategory::Electronics => "electronics",
            MerchantCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MerchantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk tier derived from the combined risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Score below 0.40
    Low,
    /// Score in [0.40, 0.70)
    Medium,
    /// Score in [0.70, 0.80)
    High,
    /// Score at or above 0.80
    Critical,
}

impl RiskLevel {
    /// Map a combined risk score to its tier
    ///
    /// Thresholds are checked from the highest down, so a score of exactly
    /// 0.80 is Critical, not High.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            RiskLevel::Critical
        } else if score >= 0.7 {
            RiskLevel::High
        } else if score >= 0.4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Tier label in its wire form
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed card transaction to score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount in currency units
    pub amount: f64,

    /// Free-text merchant name
    pub merchant_name: String,

    /// Card number as entered; separators are stripped before analysis
    pub card_number: String,
}

/// Normalized features derived from the cleaned card number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardFeatures {
    /// Position of the cleaned length between the 13 and 19 digit bounds;
    /// not clamped, so out-of-band lengths fall outside [0,1]
    pub length_score: f64,

    /// True when the Luhn checksum fails
    pub checksum_failed: bool,

    /// Consecutive-digit repetition score in [0,1]
    pub repetition_score: f64,
}

/// One scoring dimension and its weight in the combined score
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Dimension score in [0,1]
    pub score: f64,

    /// Weight applied when combining; the four weights sum to 1.0
    pub weight: f64,
}

/// Per-dimension risk breakdown included in a verdict
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskBreakdown {
    /// Merchant-category risk
    pub merchant_risk: f64,

    /// Amount risk for the classified category
    pub amount_risk: f64,

    /// Card-number risk
    pub card_risk: f64,

    /// Time-of-day / day-of-week risk
    pub temporal_risk: f64,
}

/// Scoring verdict for a single transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// True when the combined score crosses the fraud threshold
    pub is_fraudulent: bool,

    /// Discretized risk tier
    pub risk_level: RiskLevel,

    /// Combined risk score in [0,1], rounded to 2 decimals
    pub risk_score: f64,

    /// Confidence in [0.5,1], rounded to 2 decimals
    pub confidence: f64,

    /// Human-readable reasons, in a fixed order; may be empty
    pub reasons: Vec<String>,

    /// Per-dimension scores, each rounded to 2 decimals
    pub analysis: RiskBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0.80), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(0.799999), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.699999), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.399999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::Critical);
    }

    #[test]
    fn test_risk_level_wire_format() {
        assert_eq!(serde_json::to_string(&RiskLevel::Low).unwrap(), "\"LOW\"");
        assert_eq!(
            serde_json::to_string(&RiskLevel::Critical).unwrap(),
            "\"CRITICAL\""
        );
    }

    #[test]
    fn test_category_names() {
        assert_eq!(MerchantCategory::OnlineRetail.as_str(), "online_retail");
        assert_eq!(MerchantCategory::Unknown.to_string(), "unknown");
        assert_eq!(
            serde_json::to_string(&MerchantCategory::OnlineRetail).unwrap(),
            "\"online_retail\""
        );
    }
}

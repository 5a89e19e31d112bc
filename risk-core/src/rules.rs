//! Rule tables for the risk scorer
//!
//! The tables are built once, validated, and injected into the scorer;
//! nothing here is mutated after construction.

use crate::error::{Error, Result};
use crate::types::MerchantCategory;
use serde::{Deserialize, Serialize};

/// Baseline risk profile for one merchant category
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// Baseline risk in [0,1]
    pub base_risk: f64,

    /// Added on top of the baseline inside the night window, in [0,1]
    pub night_surcharge: f64,
}

/// Ascending amount breakpoints for one merchant category, in currency units
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AmountThresholds {
    /// Amounts at or below this score the flat floor
    pub low: f64,

    /// Upper bound of the first interpolated band
    pub medium: f64,

    /// Upper bound of the second interpolated band
    pub high: f64,
}

/// Complete rule set for one merchant category
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Baseline and night-surcharge risk
    pub profile: CategoryProfile,

    /// Amount breakpoints
    pub thresholds: AmountThresholds,
}

/// Time-based rule parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRules {
    /// Hour at which the night window opens (inclusive)
    pub night_start_hour: u32,

    /// Hour at which the night window closes (inclusive)
    pub night_end_hour: u32,

    /// Days of week counted as weekend; 0 = Sunday, 6 = Saturday
    pub weekend_days: Vec<u32>,
}

impl TimeRules {
    /// Whether the hour falls in the night window
    ///
    /// Evaluated literally as `hour >= start || hour <= end`, an inclusive
    /// OR spanning midnight rather than a modular range.
    pub fn is_night(&self, hour: u32) -> bool {
        hour >= self.night_start_hour || hour <= self.night_end_hour
    }

    /// Whether the day of week (0 = Sunday) is a weekend day
    pub fn is_weekend(&self, day_of_week: u32) -> bool {
        self.weekend_days.contains(&day_of_week)
    }
}

/// Complete rule tables for scoring
///
/// One entry per merchant category plus the time-window parameters. Every
/// category is present by construction, so lookups cannot fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRules {
    /// Rules for online retail merchants
    pub online_retail: CategoryRule,

    /// Rules for gambling merchants
    pub gambling: CategoryRule,

    /// Rules for travel merchants
    pub travel: CategoryRule,

    /// Rules for electronics merchants
    pub electronics: CategoryRule,

    /// Fallback rules for unclassified merchants
    pub unknown: CategoryRule,

    /// Night-window and weekend parameters
    pub time: TimeRules,
}

impl RiskRules {
    /// Rule set for a merchant category
    pub fn category(&self, category: MerchantCategory) -> &CategoryRule {
        match category {
            MerchantCategory::OnlineRetail => &self.online_retail,
            MerchantCategory::Gambling => &self.gambling,
            MerchantCategory::Travel => &self.travel,
            MerchantCategory::Electronics => &self.electronics,
            MerchantCategory::Unknown => &self.unknown,
        }
    }

    /// Validate the load-time invariants
    ///
    /// Threshold triples must be positive and strictly increasing (the
    /// amount interpolation divides by their differences), risk values must
    /// lie in [0,1], and the night hours must be valid hours of day.
    pub fn validate(&self) -> Result<()> {
        for category in [
            MerchantCategory::OnlineRetail,
            MerchantCategory::Gambling,
            MerchantCategory::Travel,
            MerchantCategory::Electronics,
            MerchantCategory::Unknown,
        ] {
            let rule = self.category(category);

            if !(0.0..=1.0).contains(&rule.profile.base_risk) {
                return Err(Error::InvalidConfig(format!(
                    "{category}: base_risk {} outside [0,1]",
                    rule.profile.base_risk
                )));
            }
            if !(0.0..=1.0).contains(&rule.profile.night_surcharge) {
                return Err(Error::InvalidConfig(format!(
                    "{category}: night_surcharge {} outside [0,1]",
                    rule.profile.night_surcharge
                )));
            }

            let t = &rule.thresholds;
            if !(t.low > 0.0 && t.low < t.medium && t.medium < t.high) {
                return Err(Error::InvalidConfig(format!(
                    "{category}: thresholds must be positive and strictly increasing, got {}/{}/{}",
                    t.low, t.medium, t.high
                )));
            }
        }

        if self.time.night_start_hour > 23 || self.time.night_end_hour > 23 {
            return Err(Error::InvalidConfig(format!(
                "night window {}..{} outside 0-23",
                self.time.night_start_hour, self.time.night_end_hour
            )));
        }
        if let Some(day) = self.time.weekend_days.iter().find(|d| **d > 6) {
            return Err(Error::InvalidConfig(format!(
                "weekend day {day} outside 0-6"
            )));
        }

        Ok(())
    }
}

impl Default for RiskRules {
    fn default() -> Self {
        RiskRules {
            online_retail: CategoryRule {
                profile: CategoryProfile {
                    base_risk: 0.4,
                    night_surcharge: 0.1,
                },
                thresholds: AmountThresholds {
                    low: 100.0,
                    medium: 500.0,
                    high: 1000.0,
                },
            },
            gambling: CategoryRule {
                profile: CategoryProfile {
                    base_risk: 0.8,
                    night_surcharge: 0.2,
                },
                thresholds: AmountThresholds {
                    low: 50.0,
                    medium: 200.0,
                    high: 500.0,
                },
            },
            travel: CategoryRule {
                profile: CategoryProfile {
                    base_risk: 0.3,
                    night_surcharge: 0.1,
                },
                thresholds: AmountThresholds {
                    low: 200.0,
                    medium: 1000.0,
                    high: 3000.0,
                },
            },
            electronics: CategoryRule {
                profile: CategoryProfile {
                    base_risk: 0.5,
                    night_surcharge: 0.15,
                },
                thresholds: AmountThresholds {
                    low: 300.0,
                    medium: 1000.0,
                    high: 2000.0,
                },
            },
            unknown: CategoryRule {
                profile: CategoryProfile {
                    base_risk: 0.6,
                    night_surcharge: 0.2,
                },
                thresholds: AmountThresholds {
                    low: 100.0,
                    medium: 500.0,
                    high: 1000.0,
                },
            },
            time: TimeRules {
                night_start_hour: 23,
                night_end_hour: 5,
                weekend_days: vec![0, 6],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        assert!(RiskRules::default().validate().is_ok());
    }

    #[test]
    fn test_non_increasing_thresholds_rejected() {
        let mut rules = RiskRules::default();
        rules.gambling.thresholds.medium = rules.gambling.thresholds.low;
        let err = rules.validate().unwrap_err();
        assert!(err.to_string().contains("gambling"));
    }

    #[test]
    fn test_out_of_range_base_risk_rejected() {
        let mut rules = RiskRules::default();
        rules.travel.profile.base_risk = 1.2;
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_bad_night_hour_rejected() {
        let mut rules = RiskRules::default();
        rules.time.night_start_hour = 24;
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_night_window_spans_midnight() {
        let time = RiskRules::default().time;
        assert!(time.is_night(23));
        assert!(time.is_night(0));
        assert!(time.is_night(5));
        assert!(!time.is_night(6));
        assert!(!time.is_night(12));
        assert!(!time.is_night(22));
    }

    #[test]
    fn test_weekend_days() {
        let time = RiskRules::default().time;
        assert!(time.is_weekend(0));
        assert!(time.is_weekend(6));
        assert!(!time.is_weekend(3));
    }
}

//! Property-based tests for scorer invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Amount risk stays within [0.20, 1.00] and has no jump at the upper breakpoints
//! - The combined score is a convex combination bounded by [0,1]
//! - The fraud flag agrees with the tier thresholds
//! - Confidence never drops below 0.5
//! - Exactly one Luhn check digit completes any digit prefix

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use risk_core::{
    card, scoring, MerchantCategory, RiskLevel, RiskScorer, Transaction,
};

/// Strategy for generating positive amounts
fn amount_strategy() -> impl Strategy<Value = f64> {
    (1u64..1_000_000_00u64).prop_map(|cents| cents as f64 / 100.0)
}

/// Strategy for generating merchant categories
fn category_strategy() -> impl Strategy<Value = MerchantCategory> {
    prop_oneof![
        Just(MerchantCategory::OnlineRetail),
        Just(MerchantCategory::Gambling),
        Just(MerchantCategory::Travel),
        Just(MerchantCategory::Electronics),
        Just(MerchantCategory::Unknown),
    ]
}

/// Strategy for generating merchant names, matched and unmatched alike
fn merchant_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Amazon Shop".to_string()),
        Just("CasinoBet Online".to_string()),
        Just("AirAsia Travel".to_string()),
        Just("TechWorld".to_string()),
        Just("Joe's Diner".to_string()),
        "[a-z ]{0,24}",
    ]
}

/// Strategy for generating card numbers, in and out of the accepted band
fn card_number_strategy() -> impl Strategy<Value = String> {
    "[0-9]{10,22}"
}

/// Strategy for generating evaluation timestamps across hours and weekdays
fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (1u32..=28u32, 0u32..24u32).prop_map(|(day, hour)| {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 30, 0).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: amount risk is bounded by [0.20, 1.00] for any positive amount
    #[test]
    fn prop_amount_risk_bounded(amount in amount_strategy(), category in category_strategy()) {
        let scorer = RiskScorer::default();
        let risk = scorer.amount_risk(amount, category);
        prop_assert!(risk >= 0.2);
        prop_assert!(risk <= 1.0);
    }

    /// Property: amount risk has no jump at the medium and high breakpoints
    #[test]
    fn prop_amount_risk_continuous_at_upper_breakpoints(category in category_strategy()) {
        let scorer = RiskScorer::default();
        let thresholds = scorer.rules().category(category).thresholds;
        let eps = 1e-9;

        for breakpoint in [thresholds.medium, thresholds.high] {
            let below = scorer.amount_risk(breakpoint, category);
            let above = scorer.amount_risk(breakpoint + eps, category);
            prop_assert!((above - below).abs() < 1e-6);
        }
    }

    /// Property: the combined score is bounded and the flag matches the
    /// recomputed weighted sum
    #[test]
    fn prop_verdict_consistent(
        amount in amount_strategy(),
        merchant in merchant_name_strategy(),
        card_number in card_number_strategy(),
        at in timestamp_strategy(),
    ) {
        let scorer = RiskScorer::default();
        let verdict = scorer.evaluate(
            &Transaction {
                amount,
                merchant_name: merchant.clone(),
                card_number: card_number.clone(),
            },
            at,
        );

        prop_assert!(verdict.risk_score >= 0.0);
        prop_assert!(verdict.risk_score <= 1.0);

        // Recompute the unrounded score through the public calculators
        use chrono::{Datelike, Timelike};
        let hour = at.hour();
        let day = at.weekday().num_days_from_sunday();
        let category = scoring::classify_merchant(&merchant);
        let features = card::extract_features(&card_number);
        let raw = scorer.merchant_risk(category, hour, day) * scoring::MERCHANT_WEIGHT
            + scorer.amount_risk(amount, category) * scoring::AMOUNT_WEIGHT
            + scorer.card_risk(&features) * scoring::CARD_WEIGHT
            + scorer.temporal_risk(hour, day) * scoring::TEMPORAL_WEIGHT;

        prop_assert_eq!(verdict.is_fraudulent, raw >= scoring::FRAUD_THRESHOLD);
        prop_assert!((verdict.risk_score - raw).abs() <= 0.005 + 1e-12);
    }

    /// Property: the flag is equivalent to landing in the High or Critical tier
    #[test]
    fn prop_flag_agrees_with_tier(
        amount in amount_strategy(),
        merchant in merchant_name_strategy(),
        card_number in card_number_strategy(),
        at in timestamp_strategy(),
    ) {
        let verdict = RiskScorer::default().evaluate(
            &Transaction { amount, merchant_name: merchant, card_number },
            at,
        );
        let flagged_tier = matches!(verdict.risk_level, RiskLevel::High | RiskLevel::Critical);
        prop_assert_eq!(verdict.is_fraudulent, flagged_tier);
    }

    /// Property: confidence never drops below the 0.5 floor
    #[test]
    fn prop_confidence_floor(
        amount in amount_strategy(),
        merchant in merchant_name_strategy(),
        card_number in card_number_strategy(),
        at in timestamp_strategy(),
    ) {
        let verdict = RiskScorer::default().evaluate(
            &Transaction { amount, merchant_name: merchant, card_number },
            at,
        );
        prop_assert!(verdict.confidence >= 0.5);
        prop_assert!(verdict.confidence <= 1.0);
    }

    /// Property: for any digit prefix exactly one final digit passes Luhn
    #[test]
    fn prop_luhn_single_check_digit(prefix in "[0-9]{12,18}") {
        let valid_count = (0..10)
            .filter(|d| card::luhn_valid(&format!("{prefix}{d}")))
            .count();
        prop_assert_eq!(valid_count, 1);
    }

    /// Property: repetition score is always within [0,1]
    #[test]
    fn prop_repetition_bounded(digits in "[0-9]{0,25}") {
        let score = card::repetition_score(&digits);
        prop_assert!(score >= 0.0);
        prop_assert!(score <= 1.0);
    }
}

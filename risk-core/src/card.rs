//! Card-number feature extraction
//!
//! Derives the normalized feature vector the card risk calculation gates on.

use crate::types::CardFeatures;

/// Shortest accepted card number length
const MIN_CARD_LEN: usize = 13;

/// Longest accepted card number length
const MAX_CARD_LEN: usize = 19;

/// Repetition counts at or above this saturate the repetition score
const REPETITION_CAP: f64 = 5.0;

/// Strip every non-digit character from the raw card number
pub fn clean_card_number(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Extract the feature vector from a raw card number
pub fn extract_features(raw: &str) -> CardFeatures {
    let cleaned = clean_card_number(raw);
    CardFeatures {
        length_score: length_score(cleaned.len()),
        checksum_failed: !luhn_valid(&cleaned),
        repetition_score: repetition_score(&cleaned),
    }
}

/// Normalized position of the length between the accepted bounds
///
/// Deliberately unclamped: lengths outside 13-19 land outside [0,1] and the
/// risk gate reads the raw value.
fn length_score(len: usize) -> f64 {
    (len as f64 - MIN_CARD_LEN as f64) / (MAX_CARD_LEN - MIN_CARD_LEN) as f64
}

/// Luhn checksum over a digit string
///
/// Traverses right to left, doubling every second digit starting from the
/// second-from-rightmost and subtracting 9 from doubled values above 9; the
/// number is valid iff the digit sum is divisible by 10. The empty string
/// sums to zero and passes. Non-digit characters contribute nothing.
pub fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    let mut double = false;

    for c in digits.chars().rev() {
        let mut digit = c.to_digit(10).unwrap_or(0);
        if double {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        double = !double;
    }

    sum % 10 == 0
}

/// Consecutive-digit repetition score
///
/// Counts one per digit beyond the second in each run of identical
/// consecutive digits, normalized against [`REPETITION_CAP`] and clamped
/// to 1.0.
pub fn repetition_score(digits: &str) -> f64 {
    let mut repetitions = 0u32;
    let mut streak = 0u32;
    let mut last = None;

    for c in digits.chars() {
        if Some(c) == last {
            streak += 1;
            if streak > 2 {
                repetitions += 1;
            }
        } else {
            streak = 1;
        }
        last = Some(c);
    }

    (f64::from(repetitions) / REPETITION_CAP).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_separators() {
        assert_eq!(clean_card_number("4532-0151-1283-0366"), "4532015112830366");
        assert_eq!(clean_card_number("4532 0151 1283 0366"), "4532015112830366");
        assert_eq!(clean_card_number("no digits"), "");
    }

    #[test]
    fn test_luhn_known_vectors() {
        assert!(luhn_valid("4532015112830366"));
        assert!(!luhn_valid("1234567890123"));
        // Empty sum is zero, vacuously valid
        assert!(luhn_valid(""));
    }

    #[test]
    fn test_luhn_single_digit_flip_invalidates() {
        assert!(luhn_valid("4532015112830366"));
        assert!(!luhn_valid("4532015112830367"));
    }

    #[test]
    fn test_length_score_bounds() {
        let f = extract_features("4532015112830366"); // 16 digits
        assert!((f.length_score - 0.5).abs() < 1e-12);

        let f = extract_features("1234567890123"); // 13 digits
        assert_eq!(f.length_score, 0.0);

        let f = extract_features("1234567890123456789"); // 19 digits
        assert!((f.length_score - 1.0).abs() < 1e-12);

        // Out-of-band lengths are not clamped
        let f = extract_features("");
        assert!(f.length_score < 0.0);
    }

    #[test]
    fn test_repetition_saturates() {
        // 13 identical digits: 11 counted repetitions, clamped to 1.0
        assert_eq!(repetition_score("1111111111111"), 1.0);
    }

    #[test]
    fn test_repetition_zero_for_short_runs() {
        assert_eq!(repetition_score("1212121212121"), 0.0);
        // Runs of exactly two never count
        assert_eq!(repetition_score("1122334455667"), 0.0);
    }

    #[test]
    fn test_repetition_partial() {
        // One run of four ones counts twice: 2 / 5
        assert!((repetition_score("1111234567890") - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_empty_card_is_degenerate_but_defined() {
        let f = extract_features("");
        assert!(!f.checksum_failed);
        assert_eq!(f.repetition_score, 0.0);
    }
}

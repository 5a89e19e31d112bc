//! Risk scoring core for CardGuard
//!
//! Heuristic, rule-based fraud scoring for payment-card transactions

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod card;
pub mod error;
pub mod rules;
pub mod scoring;
pub mod types;

pub use error::{Error, Result};
pub use rules::RiskRules;
pub use scoring::RiskScorer;
pub use types::*;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Booking policy used by [`compute_quote`](crate::quote::compute_quote).
///
/// Amounts are decimal strings or numbers in JSON:
/// `{ "deposit": "999", "escrowFraction": "0.25" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotePolicy {
    /// Fixed amount paid up front, in currency units.
    pub deposit: Decimal,
    /// Share of the post-deposit balance held in escrow.
    #[serde(alias = "escrowFraction")]
    pub escrow_fraction: Decimal,
}

impl Default for QuotePolicy {
    fn default() -> Self {
        Self {
            deposit: dec!(999),
            escrow_fraction: dec!(0.25),
        }
    }
}

impl QuotePolicy {
    pub fn new(deposit: Decimal, escrow_fraction: Decimal) -> Result<Self, ConfigError> {
        let policy = Self {
            deposit,
            escrow_fraction,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Parses and validates a policy. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let policy: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deposit < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                key: "deposit".to_string(),
                message: format!("must not be negative, got {}", self.deposit),
            });
        }
        if self.escrow_fraction < Decimal::ZERO || self.escrow_fraction > Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                key: "escrow_fraction".to_string(),
                message: format!("must be between 0 and 1, got {}", self.escrow_fraction),
            });
        }
        Ok(())
    }
}

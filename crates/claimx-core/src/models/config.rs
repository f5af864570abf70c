//! Configuration structures for the claim pipeline.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{ClaimError, Result};

/// Sales tax percentage used when none is configured.
pub const DEFAULT_SALES_TAX_PERCENTAGE: Decimal = Decimal::TEN;

/// Environment variable overriding the configured sales tax percentage.
pub const SALES_TAX_ENV: &str = "CLAIMX_SALES_TAX_PERCENTAGE";

/// Main configuration for the claimx pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimConfig {
    /// Tax configuration.
    pub tax: TaxConfig,
}

/// Tax configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Sales tax percentage, e.g. `10`. Accepts a number or a numeric
    /// string; anything else reads as unset.
    #[serde(deserialize_with = "lenient_percentage")]
    pub sales_tax_percentage: Option<Decimal>,
}

impl ClaimConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ClaimError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Load from `path` if given, otherwise defaults, then apply the
    /// environment override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.apply_env())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ClaimError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `CLAIMX_SALES_TAX_PERCENTAGE` if it is set.
    pub fn apply_env(mut self) -> Self {
        if let Ok(raw) = std::env::var(SALES_TAX_ENV) {
            self.apply_sales_tax_override(&raw);
        }
        self
    }

    /// Override the sales tax percentage from raw text. Unparsable text
    /// leaves the current value in place.
    pub fn apply_sales_tax_override(&mut self, raw: &str) {
        match parse_percentage(raw) {
            Some(rate) => self.tax.sales_tax_percentage = Some(rate),
            None => warn!("Ignoring unparsable sales tax percentage override: {:?}", raw),
        }
    }

    /// Effective sales tax percentage.
    pub fn sales_tax_percentage(&self) -> Decimal {
        self.tax
            .sales_tax_percentage
            .unwrap_or(DEFAULT_SALES_TAX_PERCENTAGE)
    }
}

/// Parse a percentage written as a plain decimal number (`"10"`, `"12.5"`).
pub fn parse_percentage(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

fn lenient_percentage<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let rate = match value {
        Some(serde_json::Value::Number(n)) => parse_percentage(&n.to_string()),
        Some(serde_json::Value::String(s)) => parse_percentage(&s),
        Some(other) => {
            warn!("Ignoring non-numeric sales tax percentage: {}", other);
            None
        }
        None => None,
    };
    Ok(rate)
}

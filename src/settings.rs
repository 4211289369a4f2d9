//! Calculator and autosave settings

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::types::{PurchaseError, PurchaseResult};

/// What to do when a line discount exceeds the line amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeAmountPolicy {
    /// Cap the discount at the line amount, leaving a zero taxable value
    #[default]
    Clamp,
    /// Refuse the line with a calculation error
    Reject,
}

/// Settings for document calculation and draft autosave
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub negative_taxable: NegativeAmountPolicy,
    /// Floor the outstanding amount at zero when paid exceeds total
    pub clamp_outstanding: bool,
    /// Minimum seconds between two autosaves of the same draft
    pub autosave_interval_secs: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            negative_taxable: NegativeAmountPolicy::Clamp,
            clamp_outstanding: false,
            autosave_interval_secs: 2,
        }
    }
}

impl CalculatorConfig {
    /// Load configuration from `purchase-core.toml` (optional) and
    /// `PURCHASE__*` environment variables, after reading any `.env` file
    pub fn load() -> PurchaseResult<Self> {
        dotenvy::dotenv().ok();

        let builder = Config::builder()
            .add_source(File::with_name("purchase-core").required(false))
            .add_source(
                Environment::with_prefix("PURCHASE")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> PurchaseResult<Self> {
        let config = builder.build()?;
        let loaded: Self = config.try_deserialize()?;
        loaded.autosave_interval()?;

        tracing::debug!(
            negative_taxable = ?loaded.negative_taxable,
            clamp_outstanding = loaded.clamp_outstanding,
            autosave_interval_secs = loaded.autosave_interval_secs,
            "calculator configuration loaded"
        );

        Ok(loaded)
    }

    /// Autosave debounce interval. Fails when the configured seconds do not
    /// fit a `chrono::Duration`.
    pub fn autosave_interval(&self) -> PurchaseResult<chrono::Duration> {
        i64::try_from(self.autosave_interval_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| {
                PurchaseError::Configuration(format!(
                    "autosave_interval_secs {} is out of range",
                    self.autosave_interval_secs
                ))
            })
    }
}

impl From<config::ConfigError> for PurchaseError {
    fn from(err: config::ConfigError) -> Self {
        PurchaseError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults_when_no_sources() {
        let config = CalculatorConfig::from_builder(Config::builder()).unwrap();
        assert_eq!(config, CalculatorConfig::default());
        assert_eq!(
            config.autosave_interval().unwrap(),
            chrono::Duration::seconds(2)
        );
    }

    #[test]
    fn test_overrides_from_toml() {
        let builder = Config::builder().add_source(File::from_str(
            "negative_taxable = \"reject\"\nclamp_outstanding = true\n",
            FileFormat::Toml,
        ));
        let config = CalculatorConfig::from_builder(builder).unwrap();

        assert_eq!(config.negative_taxable, NegativeAmountPolicy::Reject);
        assert!(config.clamp_outstanding);
        assert_eq!(config.autosave_interval_secs, 2);
    }

    #[test]
    fn test_invalid_policy_is_configuration_error() {
        let builder = Config::builder().add_source(File::from_str(
            "negative_taxable = \"ignore\"",
            FileFormat::Toml,
        ));
        let result = CalculatorConfig::from_builder(builder);
        assert!(matches!(result, Err(PurchaseError::Configuration(_))));
    }

    #[test]
    fn test_oversized_autosave_interval_is_configuration_error() {
        let builder = Config::builder().add_source(File::from_str(
            "autosave_interval_secs = 10000000000000000",
            FileFormat::Toml,
        ));
        let result = CalculatorConfig::from_builder(builder);
        assert!(matches!(result, Err(PurchaseError::Configuration(_))));

        let config = CalculatorConfig {
            autosave_interval_secs: u64::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.autosave_interval(),
            Err(PurchaseError::Configuration(_))
        ));
    }
}

//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Payroll limit configuration.
    #[serde(default)]
    pub payroll: PayrollConfig,
    /// Ledger substrate configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Payroll limit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Cap on an advance request, as a multiple of the monthly payment.
    #[serde(default = "default_limit_multiplier")]
    pub advance_limit_multiplier: Decimal,
    /// Cap on a single processed payment, as a multiple of the monthly payment.
    #[serde(default = "default_limit_multiplier")]
    pub payment_limit_multiplier: Decimal,
}

fn default_limit_multiplier() -> Decimal {
    Decimal::TWO
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            advance_limit_multiplier: default_limit_multiplier(),
            payment_limit_multiplier: default_limit_multiplier(),
        }
    }
}

/// Ledger substrate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Maximum number of entries a single range or prefix scan may return.
    #[serde(default = "default_max_scan_results")]
    pub max_scan_results: usize,
}

fn default_max_scan_results() -> usize {
    10_000
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_scan_results: default_max_scan_results(),
        }
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_filter() -> String {
    "paysettle=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PAYSETTLE").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Checks invariants the deserializer cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the first invalid field.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.payroll.advance_limit_multiplier <= Decimal::ZERO {
            return Err(config::ConfigError::Message(
                "payroll.advance_limit_multiplier must be positive".to_string(),
            ));
        }
        if self.payroll.payment_limit_multiplier <= Decimal::ZERO {
            return Err(config::ConfigError::Message(
                "payroll.payment_limit_multiplier must be positive".to_string(),
            ));
        }
        if self.ledger.max_scan_results == 0 {
            return Err(config::ConfigError::Message(
                "ledger.max_scan_results must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

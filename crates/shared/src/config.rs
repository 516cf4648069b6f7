//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger posting configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Payroll configuration.
    #[serde(default)]
    pub payroll: PayrollConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Which date the fiscal period gate resolves a period for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodGate {
    /// The real (wall-clock) posting date, regardless of the voucher date.
    #[default]
    PostingDate,
    /// The voucher date supplied with the posting.
    VoucherDate,
}

/// Ledger posting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Reject postings to accounts that have child accounts.
    #[serde(default = "default_true")]
    pub prevent_summary_posting: bool,
    /// Date used to resolve the fiscal period of a posting.
    #[serde(default)]
    pub period_gate: PeriodGate,
    /// Document type used for general ledger voucher numbers.
    #[serde(default = "default_voucher_document_type")]
    pub voucher_document_type: String,
}

fn default_true() -> bool {
    true
}

fn default_voucher_document_type() -> String {
    "VOU".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            prevent_summary_posting: true,
            period_gate: PeriodGate::default(),
            voucher_document_type: default_voucher_document_type(),
        }
    }
}

/// Payroll configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayrollConfig {
    /// GL accounts used by accrual and settlement vouchers.
    #[serde(default)]
    pub accounts: PayrollAccounts,
}

/// Account codes used by payroll postings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollAccounts {
    /// Expense account debited with the cycle's gross pay.
    #[serde(default = "default_salaries_expense")]
    pub salaries_expense: String,
    /// Liability account credited with net pay and cleared on settlement.
    #[serde(default = "default_salaries_payable")]
    pub salaries_payable: String,
    /// Liability account credited with withheld deductions.
    #[serde(default = "default_deductions_payable")]
    pub deductions_payable: String,
    /// Cash/bank account credited on settlement when none is given.
    #[serde(default = "default_cash")]
    pub default_cash: String,
}

fn default_salaries_expense() -> String {
    "5100".to_string()
}

fn default_salaries_payable() -> String {
    "2100".to_string()
}

fn default_deductions_payable() -> String {
    "2110".to_string()
}

fn default_cash() -> String {
    "1010".to_string()
}

impl Default for PayrollAccounts {
    fn default() -> Self {
        Self {
            salaries_expense: default_salaries_expense(),
            salaries_payable: default_salaries_payable(),
            deductions_payable: default_deductions_payable(),
            default_cash: default_cash(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "paybook=info,sea_orm=warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PAYBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("PAYBOOK__DATABASE__URL", Some("sqlite::memory:")),
                ("RUN_MODE", Some("test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 10);
                assert!(config.ledger.prevent_summary_posting);
                assert_eq!(config.ledger.period_gate, PeriodGate::PostingDate);
                assert_eq!(config.ledger.voucher_document_type, "VOU");
                assert_eq!(config.payroll.accounts, PayrollAccounts::default());
                assert!(!config.logging.json);
            },
        );
    }

    #[test]
    fn test_load_overrides_from_environment() {
        temp_env::with_vars(
            [
                ("PAYBOOK__DATABASE__URL", Some("sqlite::memory:")),
                ("PAYBOOK__LEDGER__PREVENT_SUMMARY_POSTING", Some("false")),
                ("PAYBOOK__LEDGER__PERIOD_GATE", Some("voucher_date")),
                ("PAYBOOK__PAYROLL__ACCOUNTS__DEFAULT_CASH", Some("1020")),
                ("RUN_MODE", Some("test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert!(!config.ledger.prevent_summary_posting);
                assert_eq!(config.ledger.period_gate, PeriodGate::VoucherDate);
                assert_eq!(config.payroll.accounts.default_cash, "1020");
                assert_eq!(config.payroll.accounts.salaries_payable, "2100");
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("PAYBOOK__DATABASE__URL", None::<&str>),
                ("RUN_MODE", Some("test")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}

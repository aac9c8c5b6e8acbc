use fleet_core::config as core_config;
use fleet_core::error::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use validator::ValidateEmail;

#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub financial_visibility: FinancialVisibilityDefaults,
}

/// Values used when a tenant's financial visibility record is first created.
#[derive(Debug, Clone, Deserialize)]
pub struct FinancialVisibilityDefaults {
    pub show_financial_data_to_managers: bool,
    pub show_detailed_reports_to_managers: bool,
    pub show_analytics_to_managers: bool,
    pub alert_threshold: Decimal,
    pub report_recipients: Vec<String>,
}

impl Default for FinancialVisibilityDefaults {
    fn default() -> Self {
        Self {
            show_financial_data_to_managers: false,
            show_detailed_reports_to_managers: false,
            show_analytics_to_managers: true,
            alert_threshold: Decimal::new(1000, 0),
            report_recipients: Vec::new(),
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            service_name: "account-service".to_string(),
            financial_visibility: FinancialVisibilityDefaults::default(),
        }
    }
}

impl AccountConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let defaults = FinancialVisibilityDefaults::default();

        let config = AccountConfig {
            common,
            service_name: get_env("SERVICE_NAME", "account-service"),
            financial_visibility: FinancialVisibilityDefaults {
                show_financial_data_to_managers: parse_bool(
                    "FINANCIAL_SHOW_DATA_TO_MANAGERS",
                    defaults.show_financial_data_to_managers,
                )?,
                show_detailed_reports_to_managers: parse_bool(
                    "FINANCIAL_SHOW_REPORTS_TO_MANAGERS",
                    defaults.show_detailed_reports_to_managers,
                )?,
                show_analytics_to_managers: parse_bool(
                    "FINANCIAL_SHOW_ANALYTICS_TO_MANAGERS",
                    defaults.show_analytics_to_managers,
                )?,
                alert_threshold: match env::var("FINANCIAL_ALERT_THRESHOLD") {
                    Ok(val) => Decimal::from_str(val.trim()).map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "FINANCIAL_ALERT_THRESHOLD is not a decimal: {}",
                            e
                        ))
                    })?,
                    Err(_) => defaults.alert_threshold,
                },
                report_recipients: env::var("FINANCIAL_REPORT_RECIPIENTS")
                    .map(|val| {
                        val.split(',')
                            .map(|s| s.trim().to_lowercase())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or(defaults.report_recipients),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let financial = &self.financial_visibility;

        if financial.alert_threshold.is_sign_negative() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "FINANCIAL_ALERT_THRESHOLD must not be negative"
            )));
        }

        if let Some(bad) = financial
            .report_recipients
            .iter()
            .find(|r| !r.validate_email())
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Invalid report recipient: {}",
                bad
            )));
        }

        if self.common.is_prod() && self.service_name.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SERVICE_NAME is required in production"
            )));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(key: &str, default: bool) -> Result<bool, AppError> {
    match env::var(key) {
        Ok(val) => match val.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} must be a boolean, got '{}'",
                key,
                other
            ))),
        },
        Err(_) => Ok(default),
    }
}

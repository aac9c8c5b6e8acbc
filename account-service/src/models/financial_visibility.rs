//! Financial visibility settings - which roles see money figures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use super::account_type::AccountType;
use super::sync::SyncMetadata;
use crate::config::FinancialVisibilityDefaults;
use crate::services::store::Document;

/// Role vocabulary used by the financial visibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialRole {
    Owner,
    Admin,
    Dealer,
    Manager,
    Premium,
    Standard,
    Technician,
}

impl FinancialRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinancialRole::Owner => "owner",
            FinancialRole::Admin => "admin",
            FinancialRole::Dealer => "dealer",
            FinancialRole::Manager => "manager",
            FinancialRole::Premium => "premium",
            FinancialRole::Standard => "standard",
            FinancialRole::Technician => "technician",
        }
    }

    /// Unknown roles resolve to `Standard`, which sees nothing.
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "owner" => FinancialRole::Owner,
            "admin" => FinancialRole::Admin,
            "dealer" => FinancialRole::Dealer,
            "manager" => FinancialRole::Manager,
            "premium" => FinancialRole::Premium,
            "technician" => FinancialRole::Technician,
            _ => FinancialRole::Standard,
        }
    }

    fn tier(&self) -> VisibilityTier {
        match self {
            FinancialRole::Owner | FinancialRole::Admin | FinancialRole::Dealer => {
                VisibilityTier::Always
            }
            FinancialRole::Manager | FinancialRole::Premium => VisibilityTier::Toggle,
            FinancialRole::Standard | FinancialRole::Technician => VisibilityTier::Never,
        }
    }
}

impl From<AccountType> for FinancialRole {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Owner => FinancialRole::Owner,
            AccountType::Manager => FinancialRole::Manager,
            AccountType::Technician => FinancialRole::Technician,
        }
    }
}

enum VisibilityTier {
    Always,
    Toggle,
    Never,
}

/// One record per business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialVisibilitySetting {
    /// Equal to the owning business id.
    pub id: String,
    pub show_financial_data_to_managers: bool,
    pub show_detailed_reports_to_managers: bool,
    pub show_analytics_to_managers: bool,
    pub alert_threshold: Decimal,
    pub report_recipients: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by_user_id: Option<String>,
    #[serde(default)]
    pub sync: SyncMetadata,
}

impl FinancialVisibilitySetting {
    pub fn with_defaults(business_id: String, defaults: &FinancialVisibilityDefaults) -> Self {
        let now = Utc::now();
        Self {
            id: business_id,
            show_financial_data_to_managers: defaults.show_financial_data_to_managers,
            show_detailed_reports_to_managers: defaults.show_detailed_reports_to_managers,
            show_analytics_to_managers: defaults.show_analytics_to_managers,
            alert_threshold: defaults.alert_threshold,
            report_recipients: defaults.report_recipients.clone(),
            created_at: now,
            updated_at: now,
            updated_by_user_id: None,
            sync: SyncMetadata::default(),
        }
    }

    pub fn business_id(&self) -> &str {
        &self.id
    }

    pub fn can_user_see_financial_data(&self, role: FinancialRole) -> bool {
        Self::resolve(role, self.show_financial_data_to_managers)
    }

    pub fn can_user_see_detailed_reports(&self, role: FinancialRole) -> bool {
        Self::resolve(role, self.show_detailed_reports_to_managers)
    }

    pub fn can_user_see_analytics(&self, role: FinancialRole) -> bool {
        Self::resolve(role, self.show_analytics_to_managers)
    }

    fn resolve(role: FinancialRole, toggle: bool) -> bool {
        match role.tier() {
            VisibilityTier::Always => true,
            VisibilityTier::Toggle => toggle,
            VisibilityTier::Never => false,
        }
    }

    /// Apply a partial update and stamp the updater. The caller authorizes `by_user_id`.
    pub fn apply_update(&mut self, update: &FinancialVisibilityUpdate, by_user_id: &str) {
        if let Some(v) = update.show_financial_data_to_managers {
            self.show_financial_data_to_managers = v;
        }
        if let Some(v) = update.show_detailed_reports_to_managers {
            self.show_detailed_reports_to_managers = v;
        }
        if let Some(v) = update.show_analytics_to_managers {
            self.show_analytics_to_managers = v;
        }
        if let Some(v) = update.alert_threshold {
            self.alert_threshold = v;
        }
        if let Some(recipients) = &update.report_recipients {
            self.report_recipients = recipients.iter().map(|r| r.to_lowercase()).collect();
        }
        self.updated_at = Utc::now();
        self.updated_by_user_id = Some(by_user_id.to_string());
    }
}

impl Document for FinancialVisibilitySetting {
    const COLLECTION: &'static str = "financial_visibility_settings";

    fn document_id(&self) -> &str {
        &self.id
    }
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialVisibilityUpdate {
    pub show_financial_data_to_managers: Option<bool>,
    pub show_detailed_reports_to_managers: Option<bool>,
    pub show_analytics_to_managers: Option<bool>,
    pub alert_threshold: Option<Decimal>,
    pub report_recipients: Option<Vec<String>>,
}

impl Validate for FinancialVisibilityUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(threshold) = self.alert_threshold {
            if threshold.is_sign_negative() {
                errors.add("alert_threshold", ValidationError::new("non_negative"));
            }
        }

        if let Some(recipients) = &self.report_recipients {
            if recipients.iter().any(|r| !r.validate_email()) {
                errors.add("report_recipients", ValidationError::new("email"));
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

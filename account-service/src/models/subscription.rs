//! Subscription tier policy - plan limits and feature flags.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::account_type::AccountType;
use crate::services::ServiceError;

/// Subscription plan of a business account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Trial,
    Basic,
    Pro,
    Enterprise,
}

/// Billing period chosen at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Monthly,
    Yearly,
}

impl BillingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Yearly => "yearly",
        }
    }
}

/// A countable unit against a plan limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    Vehicle,
    Manager,
    Technician,
    Location,
}

impl Seat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Seat::Vehicle => "vehicle",
            Seat::Manager => "manager",
            Seat::Technician => "technician",
            Seat::Location => "location",
        }
    }

    /// Seat consumed by a member of the given type. Owners do not consume a seat.
    pub fn for_account_type(account_type: AccountType) -> Option<Seat> {
        match account_type {
            AccountType::Owner => None,
            AccountType::Manager => Some(Seat::Manager),
            AccountType::Technician => Some(Seat::Technician),
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const FEATURE_BASIC_TRACKING: &str = "basic_tracking";
pub const FEATURE_INVENTORY: &str = "inventory_management";
pub const FEATURE_SERVICE_RECORDS: &str = "service_records";
pub const FEATURE_SCHEDULING: &str = "scheduling";
pub const FEATURE_GPS_TRACKING: &str = "gps_tracking";
pub const FEATURE_PURCHASE_ORDERS: &str = "purchase_orders";
pub const FEATURE_FINANCIAL_REPORTS: &str = "financial_reports";
pub const FEATURE_MULTI_LOCATION: &str = "multi_location";
pub const FEATURE_INTEGRATIONS: &str = "integrations";
pub const FEATURE_API_ACCESS: &str = "api_access";
pub const FEATURE_PRIORITY_SUPPORT: &str = "priority_support";

/// Limits and features derived from a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionLimitations {
    pub max_vehicles: u32,
    pub max_managers: u32,
    pub max_technicians: u32,
    pub max_locations: u32,
    pub features: Vec<String>,
    pub can_create_managers: bool,
    pub can_access_reports: bool,
    pub can_use_integrations: bool,
}

impl SubscriptionLimitations {
    pub fn max_for(&self, seat: Seat) -> u32 {
        match seat {
            Seat::Vehicle => self.max_vehicles,
            Seat::Manager => self.max_managers,
            Seat::Technician => self.max_technicians,
            Seat::Location => self.max_locations,
        }
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

fn features(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl SubscriptionPlan {
    pub const ALL: [SubscriptionPlan; 4] = [
        SubscriptionPlan::Trial,
        SubscriptionPlan::Basic,
        SubscriptionPlan::Pro,
        SubscriptionPlan::Enterprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Trial => "trial",
            SubscriptionPlan::Basic => "basic",
            SubscriptionPlan::Pro => "pro",
            SubscriptionPlan::Enterprise => "enterprise",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubscriptionPlan::Trial => "Free Trial",
            SubscriptionPlan::Basic => "Basic",
            SubscriptionPlan::Pro => "Professional",
            SubscriptionPlan::Enterprise => "Enterprise",
        }
    }

    /// Table lookup; no stored state.
    pub fn limitations(&self) -> SubscriptionLimitations {
        match self {
            SubscriptionPlan::Trial => SubscriptionLimitations {
                max_vehicles: 3,
                max_managers: 0,
                max_technicians: 2,
                max_locations: 1,
                features: features(&[FEATURE_BASIC_TRACKING, FEATURE_INVENTORY]),
                can_create_managers: false,
                can_access_reports: false,
                can_use_integrations: false,
            },
            SubscriptionPlan::Basic => SubscriptionLimitations {
                max_vehicles: 5,
                max_managers: 0,
                max_technicians: 5,
                max_locations: 1,
                features: features(&[
                    FEATURE_BASIC_TRACKING,
                    FEATURE_INVENTORY,
                    FEATURE_SERVICE_RECORDS,
                    FEATURE_SCHEDULING,
                ]),
                can_create_managers: false,
                can_access_reports: true,
                can_use_integrations: false,
            },
            SubscriptionPlan::Pro => SubscriptionLimitations {
                max_vehicles: 15,
                max_managers: 3,
                max_technicians: 15,
                max_locations: 3,
                features: features(&[
                    FEATURE_BASIC_TRACKING,
                    FEATURE_INVENTORY,
                    FEATURE_SERVICE_RECORDS,
                    FEATURE_SCHEDULING,
                    FEATURE_GPS_TRACKING,
                    FEATURE_PURCHASE_ORDERS,
                    FEATURE_FINANCIAL_REPORTS,
                    FEATURE_MULTI_LOCATION,
                ]),
                can_create_managers: true,
                can_access_reports: true,
                can_use_integrations: false,
            },
            SubscriptionPlan::Enterprise => SubscriptionLimitations {
                max_vehicles: 100,
                max_managers: 25,
                max_technicians: 250,
                max_locations: 50,
                features: features(&[
                    FEATURE_BASIC_TRACKING,
                    FEATURE_INVENTORY,
                    FEATURE_SERVICE_RECORDS,
                    FEATURE_SCHEDULING,
                    FEATURE_GPS_TRACKING,
                    FEATURE_PURCHASE_ORDERS,
                    FEATURE_FINANCIAL_REPORTS,
                    FEATURE_MULTI_LOCATION,
                    FEATURE_INTEGRATIONS,
                    FEATURE_API_ACCESS,
                    FEATURE_PRIORITY_SUPPORT,
                ]),
                can_create_managers: true,
                can_access_reports: true,
                can_use_integrations: true,
            },
        }
    }
}

impl std::str::FromStr for SubscriptionPlan {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trial" => Ok(SubscriptionPlan::Trial),
            "basic" => Ok(SubscriptionPlan::Basic),
            "pro" => Ok(SubscriptionPlan::Pro),
            "enterprise" => Ok(SubscriptionPlan::Enterprise),
            _ => Err(ServiceError::Configuration(format!(
                "Unknown subscription plan: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

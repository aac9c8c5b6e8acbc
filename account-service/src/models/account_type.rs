//! Account type policy - role defaults and invitation authority.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::permission::Permission;
use crate::services::ServiceError;

/// Member role within a business account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Owner,
    Manager,
    Technician,
}

const MANAGER_DEFAULTS: &[Permission] = &[
    Permission::ViewVehicles,
    Permission::EditVehicles,
    Permission::AddVehicles,
    Permission::AssignVehicles,
    Permission::ViewUsers,
    Permission::ManageUsers,
    Permission::ViewInventory,
    Permission::ManageInventory,
    Permission::ManageWarehouses,
    Permission::CreatePurchaseOrders,
    Permission::ApprovePurchaseOrders,
    Permission::ViewSchedule,
    Permission::ManageSchedule,
    Permission::ManageServiceRecords,
    Permission::ViewReports,
    Permission::ViewAnalytics,
    Permission::ExportData,
];

const TECHNICIAN_DEFAULTS: &[Permission] = &[
    Permission::ViewVehicles,
    Permission::ViewInventory,
    Permission::ViewSchedule,
    Permission::ManageServiceRecords,
];

impl AccountType {
    pub const ALL: [AccountType; 3] = [
        AccountType::Owner,
        AccountType::Manager,
        AccountType::Technician,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Owner => "owner",
            AccountType::Manager => "manager",
            AccountType::Technician => "technician",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Owner => "Business Owner",
            AccountType::Manager => "Manager",
            AccountType::Technician => "Technician",
        }
    }

    /// Role defaults. Owners hold the whole catalog.
    pub fn default_permissions(&self) -> BTreeSet<Permission> {
        match self {
            AccountType::Owner => Permission::ALL.iter().copied().collect(),
            AccountType::Manager => MANAGER_DEFAULTS.iter().copied().collect(),
            AccountType::Technician => TECHNICIAN_DEFAULTS.iter().copied().collect(),
        }
    }

    /// Whether `permission` is part of this role's defaults.
    pub fn grants_by_default(&self, permission: Permission) -> bool {
        match self {
            AccountType::Owner => true,
            AccountType::Manager => MANAGER_DEFAULTS.contains(&permission),
            AccountType::Technician => TECHNICIAN_DEFAULTS.contains(&permission),
        }
    }

    /// Maximum members of this type per business; `None` means bounded only by the plan.
    pub fn max_users(&self) -> Option<u32> {
        match self {
            AccountType::Owner => Some(1),
            AccountType::Manager | AccountType::Technician => None,
        }
    }

    pub fn invitable_types(&self) -> &'static [AccountType] {
        match self {
            AccountType::Owner => &[AccountType::Manager, AccountType::Technician],
            AccountType::Manager => &[AccountType::Technician],
            AccountType::Technician => &[],
        }
    }

    pub fn can_invite(&self, invitee: AccountType) -> bool {
        self.invitable_types().contains(&invitee)
    }
}

impl std::str::FromStr for AccountType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(AccountType::Owner),
            "manager" => Ok(AccountType::Manager),
            "technician" => Ok(AccountType::Technician),
            _ => Err(ServiceError::Configuration(format!(
                "Unknown account type: {}",
                s
            ))),
        }
    }
}

//! Permission catalog - the fixed set of capability grants.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::services::ServiceError;

/// Grouping used to present permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    VehicleManagement,
    UserManagement,
    InventoryManagement,
    Scheduling,
    ReportsAnalytics,
    BusinessSettings,
}

impl PermissionCategory {
    pub const ALL: [PermissionCategory; 6] = [
        PermissionCategory::VehicleManagement,
        PermissionCategory::UserManagement,
        PermissionCategory::InventoryManagement,
        PermissionCategory::Scheduling,
        PermissionCategory::ReportsAnalytics,
        PermissionCategory::BusinessSettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionCategory::VehicleManagement => "vehicle_management",
            PermissionCategory::UserManagement => "user_management",
            PermissionCategory::InventoryManagement => "inventory_management",
            PermissionCategory::Scheduling => "scheduling",
            PermissionCategory::ReportsAnalytics => "reports_analytics",
            PermissionCategory::BusinessSettings => "business_settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PermissionCategory::VehicleManagement => "Vehicle Management",
            PermissionCategory::UserManagement => "User Management",
            PermissionCategory::InventoryManagement => "Inventory Management",
            PermissionCategory::Scheduling => "Scheduling",
            PermissionCategory::ReportsAnalytics => "Reports & Analytics",
            PermissionCategory::BusinessSettings => "Business Settings",
        }
    }

    /// Permissions belonging to this category, in catalog order.
    pub fn permissions(&self) -> Vec<Permission> {
        Permission::ALL
            .iter()
            .copied()
            .filter(|p| p.category() == *self)
            .collect()
    }
}

/// A single capability grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Vehicle management
    ViewVehicles,
    EditVehicles,
    AddVehicles,
    DeleteVehicles,
    AssignVehicles,
    // User management
    ViewUsers,
    ManageUsers,
    ManagePermissions,
    // Inventory management
    ViewInventory,
    ManageInventory,
    ManageWarehouses,
    CreatePurchaseOrders,
    ApprovePurchaseOrders,
    // Scheduling
    ViewSchedule,
    ManageSchedule,
    ManageServiceRecords,
    // Reports & analytics
    ViewReports,
    ViewFinancialReports,
    ViewAnalytics,
    ExportData,
    // Business settings
    ManageBusinessSettings,
    ManageLocations,
    ManageSubscription,
    ManageIntegrations,
}

impl Permission {
    pub const ALL: [Permission; 24] = [
        Permission::ViewVehicles,
        Permission::EditVehicles,
        Permission::AddVehicles,
        Permission::DeleteVehicles,
        Permission::AssignVehicles,
        Permission::ViewUsers,
        Permission::ManageUsers,
        Permission::ManagePermissions,
        Permission::ViewInventory,
        Permission::ManageInventory,
        Permission::ManageWarehouses,
        Permission::CreatePurchaseOrders,
        Permission::ApprovePurchaseOrders,
        Permission::ViewSchedule,
        Permission::ManageSchedule,
        Permission::ManageServiceRecords,
        Permission::ViewReports,
        Permission::ViewFinancialReports,
        Permission::ViewAnalytics,
        Permission::ExportData,
        Permission::ManageBusinessSettings,
        Permission::ManageLocations,
        Permission::ManageSubscription,
        Permission::ManageIntegrations,
    ];

    /// Symbolic name, as persisted.
    pub fn key(&self) -> &'static str {
        match self {
            Permission::ViewVehicles => "view_vehicles",
            Permission::EditVehicles => "edit_vehicles",
            Permission::AddVehicles => "add_vehicles",
            Permission::DeleteVehicles => "delete_vehicles",
            Permission::AssignVehicles => "assign_vehicles",
            Permission::ViewUsers => "view_users",
            Permission::ManageUsers => "manage_users",
            Permission::ManagePermissions => "manage_permissions",
            Permission::ViewInventory => "view_inventory",
            Permission::ManageInventory => "manage_inventory",
            Permission::ManageWarehouses => "manage_warehouses",
            Permission::CreatePurchaseOrders => "create_purchase_orders",
            Permission::ApprovePurchaseOrders => "approve_purchase_orders",
            Permission::ViewSchedule => "view_schedule",
            Permission::ManageSchedule => "manage_schedule",
            Permission::ManageServiceRecords => "manage_service_records",
            Permission::ViewReports => "view_reports",
            Permission::ViewFinancialReports => "view_financial_reports",
            Permission::ViewAnalytics => "view_analytics",
            Permission::ExportData => "export_data",
            Permission::ManageBusinessSettings => "manage_business_settings",
            Permission::ManageLocations => "manage_locations",
            Permission::ManageSubscription => "manage_subscription",
            Permission::ManageIntegrations => "manage_integrations",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Permission::ViewVehicles => "View Vehicles",
            Permission::EditVehicles => "Edit Vehicles",
            Permission::AddVehicles => "Add Vehicles",
            Permission::DeleteVehicles => "Delete Vehicles",
            Permission::AssignVehicles => "Assign Vehicles",
            Permission::ViewUsers => "View Users",
            Permission::ManageUsers => "Manage Users",
            Permission::ManagePermissions => "Manage Permissions",
            Permission::ViewInventory => "View Inventory",
            Permission::ManageInventory => "Manage Inventory",
            Permission::ManageWarehouses => "Manage Warehouses",
            Permission::CreatePurchaseOrders => "Create Purchase Orders",
            Permission::ApprovePurchaseOrders => "Approve Purchase Orders",
            Permission::ViewSchedule => "View Schedule",
            Permission::ManageSchedule => "Manage Schedule",
            Permission::ManageServiceRecords => "Manage Service Records",
            Permission::ViewReports => "View Reports",
            Permission::ViewFinancialReports => "View Financial Reports",
            Permission::ViewAnalytics => "View Analytics",
            Permission::ExportData => "Export Data",
            Permission::ManageBusinessSettings => "Manage Business Settings",
            Permission::ManageLocations => "Manage Locations",
            Permission::ManageSubscription => "Manage Subscription",
            Permission::ManageIntegrations => "Manage Integrations",
        }
    }

    pub fn category(&self) -> PermissionCategory {
        match self {
            Permission::ViewVehicles
            | Permission::EditVehicles
            | Permission::AddVehicles
            | Permission::DeleteVehicles
            | Permission::AssignVehicles => PermissionCategory::VehicleManagement,
            Permission::ViewUsers | Permission::ManageUsers | Permission::ManagePermissions => {
                PermissionCategory::UserManagement
            }
            Permission::ViewInventory
            | Permission::ManageInventory
            | Permission::ManageWarehouses
            | Permission::CreatePurchaseOrders
            | Permission::ApprovePurchaseOrders => PermissionCategory::InventoryManagement,
            Permission::ViewSchedule
            | Permission::ManageSchedule
            | Permission::ManageServiceRecords => PermissionCategory::Scheduling,
            Permission::ViewReports
            | Permission::ViewFinancialReports
            | Permission::ViewAnalytics
            | Permission::ExportData => PermissionCategory::ReportsAnalytics,
            Permission::ManageBusinessSettings
            | Permission::ManageLocations
            | Permission::ManageSubscription
            | Permission::ManageIntegrations => PermissionCategory::BusinessSettings,
        }
    }

    /// Parse a persisted key. Unknown keys are a configuration error.
    pub fn parse(key: &str) -> Result<Self, ServiceError> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.key() == key)
            .ok_or_else(|| ServiceError::Configuration(format!("Unknown permission: {}", key)))
    }
}

impl std::str::FromStr for Permission {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::parse(s)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

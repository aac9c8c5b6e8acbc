//! Business account model - the tenant aggregate root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::account_type::AccountType;
use super::subscription::{BillingPeriod, SubscriptionLimitations, SubscriptionPlan};
use super::sync::SyncMetadata;
use super::user_account::UserAccount;
use crate::services::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    SoleProprietorship,
    Partnership,
    Corporation,
    Nonprofit,
    Government,
}

/// Self-reported fleet size at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleetSize {
    Small,
    Medium,
    Large,
    VeryLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagementStructure {
    SingleManager,
    MultipleManagers,
    Hierarchical,
}

/// Tenant record. Member accounts are stored separately and attached on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessAccount {
    pub id: String,
    pub name: String,
    pub business_type: BusinessType,
    pub industry: String,
    pub fleet_size: FleetSize,
    pub subscription_plan: SubscriptionPlan,
    pub billing_period: BillingPeriod,
    pub management_structure: ManagementStructure,
    pub max_vehicles: u32,
    pub max_managers: u32,
    pub max_technicians: u32,
    pub max_locations: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub user_accounts: Vec<UserAccount>,
    #[serde(default)]
    pub sync: SyncMetadata,
}

impl BusinessAccount {
    /// Create a new business account with limits derived from `plan`.
    pub fn new(
        name: String,
        business_type: BusinessType,
        industry: String,
        fleet_size: FleetSize,
        plan: SubscriptionPlan,
        billing_period: BillingPeriod,
        management_structure: ManagementStructure,
    ) -> Self {
        let now = Utc::now();
        let limits = plan.limitations();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            business_type,
            industry,
            fleet_size,
            subscription_plan: plan,
            billing_period,
            management_structure,
            max_vehicles: limits.max_vehicles,
            max_managers: limits.max_managers,
            max_technicians: limits.max_technicians,
            max_locations: limits.max_locations,
            is_active: true,
            created_at: now,
            updated_at: now,
            user_accounts: Vec::new(),
            sync: SyncMetadata::default(),
        }
    }

    pub fn limitations(&self) -> SubscriptionLimitations {
        self.subscription_plan.limitations()
    }

    /// Quota is checked by the caller before this is invoked.
    pub fn add_user_account(&mut self, user: UserAccount) {
        self.user_accounts.push(user);
        self.updated_at = Utc::now();
    }

    /// Switch plan and re-derive seat limits. Existing members are left in place.
    pub fn change_plan(&mut self, plan: SubscriptionPlan, billing_period: BillingPeriod) {
        let limits = plan.limitations();
        self.subscription_plan = plan;
        self.billing_period = billing_period;
        self.max_vehicles = limits.max_vehicles;
        self.max_managers = limits.max_managers;
        self.max_technicians = limits.max_technicians;
        self.max_locations = limits.max_locations;
        self.updated_at = Utc::now();
    }

    /// Deactivate the tenant and every attached member.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        for user in &mut self.user_accounts {
            user.deactivate();
        }
        self.updated_at = Utc::now();
    }

    pub fn owner(&self) -> Option<&UserAccount> {
        self.user_accounts
            .iter()
            .find(|u| u.is_active && u.is_owner())
    }

    pub fn member(&self, user_id: &str) -> Option<&UserAccount> {
        self.user_accounts.iter().find(|u| u.id == user_id)
    }

    pub fn member_mut(&mut self, user_id: &str) -> Option<&mut UserAccount> {
        self.user_accounts.iter_mut().find(|u| u.id == user_id)
    }

    pub fn find_member_by_email(&self, email: &str) -> Option<&UserAccount> {
        let email = email.to_lowercase();
        self.user_accounts.iter().find(|u| u.email == email)
    }

    pub fn active_members_of(&self, account_type: AccountType) -> u32 {
        self.user_accounts
            .iter()
            .filter(|u| u.is_active && u.account_type == account_type)
            .count() as u32
    }
}

/// Request to create a business account together with its owner.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 120))]
    pub business_name: String,
    pub business_type: BusinessType,
    #[validate(length(min = 1, max = 80))]
    pub industry: String,
    pub fleet_size: FleetSize,
    pub plan: SubscriptionPlan,
    pub billing_period: BillingPeriod,
    pub management_structure: ManagementStructure,
    #[validate(length(min = 1, max = 120))]
    pub owner_name: String,
    #[validate(email)]
    pub owner_email: String,
    #[validate(length(min = 8))]
    pub owner_password: String,
}

impl Document for BusinessAccount {
    const COLLECTION: &'static str = "business_accounts";

    fn document_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::CredentialHash;

    fn business(plan: SubscriptionPlan) -> BusinessAccount {
        BusinessAccount::new(
            "Northwind Haulage".to_string(),
            BusinessType::Corporation,
            "logistics".to_string(),
            FleetSize::Medium,
            plan,
            BillingPeriod::Monthly,
            ManagementStructure::MultipleManagers,
        )
    }

    fn member(business: &BusinessAccount, account_type: AccountType) -> UserAccount {
        UserAccount::new(
            business.id.clone(),
            "Member".to_string(),
            format!("{}@northwind.test", account_type.as_str()),
            CredentialHash::new("opaque".to_string()),
            account_type,
            None,
        )
    }

    #[test]
    fn test_limits_derived_at_creation() {
        let b = business(SubscriptionPlan::Pro);
        let limits = SubscriptionPlan::Pro.limitations();
        assert_eq!(b.max_vehicles, limits.max_vehicles);
        assert_eq!(b.max_vehicles, 15);
        assert_eq!(b.max_managers, limits.max_managers);
        assert_eq!(b.max_technicians, limits.max_technicians);
        assert!(b.is_active);
        assert!(b.user_accounts.is_empty());
        assert_eq!(b.created_at, b.updated_at);
    }

    #[test]
    fn test_change_plan_rederives_limits() {
        let mut b = business(SubscriptionPlan::Trial);
        b.change_plan(SubscriptionPlan::Enterprise, BillingPeriod::Yearly);
        assert_eq!(b.max_vehicles, SubscriptionPlan::Enterprise.limitations().max_vehicles);
        assert_eq!(b.billing_period, BillingPeriod::Yearly);
        assert!(b.updated_at >= b.created_at);
    }

    #[test]
    fn test_deactivate_cascades_to_members() {
        let mut b = business(SubscriptionPlan::Pro);
        let owner = member(&b, AccountType::Owner);
        let tech = member(&b, AccountType::Technician);
        b.add_user_account(owner);
        b.add_user_account(tech);

        b.deactivate();

        assert!(!b.is_active);
        assert!(b.user_accounts.iter().all(|u| !u.is_active));
        assert_eq!(b.user_accounts.len(), 2);
        assert!(b.owner().is_none());
    }

    #[test]
    fn test_active_member_counts() {
        let mut b = business(SubscriptionPlan::Pro);
        b.add_user_account(member(&b, AccountType::Owner));
        b.add_user_account(member(&b, AccountType::Technician));
        let mut gone = member(&b, AccountType::Technician);
        gone.deactivate();
        b.add_user_account(gone);

        assert_eq!(b.active_members_of(AccountType::Technician), 1);
        assert_eq!(b.active_members_of(AccountType::Owner), 1);
        assert!(b.owner().is_some());
    }

    #[test]
    fn test_members_are_not_serialized_inline() {
        let mut b = business(SubscriptionPlan::Basic);
        b.add_user_account(member(&b, AccountType::Owner));
        let json = serde_json::to_value(&b).unwrap();
        assert!(json.get("user_accounts").is_none());
        assert_eq!(json["subscription_plan"], "basic");
    }
}

//! Test helper module for account-service integration tests.
//!
//! Wires every service against one in-memory record store.

#![allow(dead_code)]

use account_service::{
    config::AccountConfig,
    models::{
        AccountType, BillingPeriod, BusinessAccount, BusinessType, FleetSize,
        InviteUserRequest, ManagementStructure, SignUpRequest, SubscriptionPlan, UserAccount,
    },
    services::{metrics, MemoryStore},
    AppState,
};
use std::sync::Arc;

pub const OWNER_PASSWORD: &str = "owner-pass-123";
pub const MEMBER_PASSWORD: &str = "member-pass-123";

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AccountConfig::default())
    }

    pub fn with_config(config: AccountConfig) -> Self {
        metrics::init_metrics();
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config, store.clone());
        Self { store, state }
    }

    pub fn sign_up_request(plan: SubscriptionPlan) -> SignUpRequest {
        SignUpRequest {
            business_name: "Ridgeway Transport".to_string(),
            business_type: BusinessType::Corporation,
            industry: "logistics".to_string(),
            fleet_size: FleetSize::Medium,
            plan,
            billing_period: BillingPeriod::Monthly,
            management_structure: ManagementStructure::MultipleManagers,
            owner_name: "Alex Morgan".to_string(),
            owner_email: "alex@ridgeway.test".to_string(),
            owner_password: OWNER_PASSWORD.to_string(),
        }
    }

    /// Sign up a business and return it together with its owner.
    pub async fn business(&self, plan: SubscriptionPlan) -> (BusinessAccount, UserAccount) {
        let business = self
            .state
            .accounts
            .sign_up(Self::sign_up_request(plan))
            .await
            .expect("sign up");
        let owner = business.owner().cloned().expect("owner");
        (business, owner)
    }

    pub async fn invite(
        &self,
        business: &BusinessAccount,
        inviter: &UserAccount,
        account_type: AccountType,
        email: &str,
    ) -> UserAccount {
        self.state
            .invitations
            .invite(
                &business.id,
                &inviter.id,
                InviteUserRequest::new("Team Member", email, account_type, MEMBER_PASSWORD),
            )
            .await
            .expect("invite")
    }
}

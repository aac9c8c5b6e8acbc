use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use super::error::ServiceError;
use super::store::{self, RecordStore};
use crate::models::{
    AccessScope, AccountType, BillingPeriod, BusinessAccount, Permission, SignUpRequest,
    SubscriptionPlan, UserAccount,
};
use crate::utils::{hash_credential, verify_credential, Password};

/// Tenant lifecycle: sign-up, login, plan changes, member administration.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn RecordStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a business and its single owner in one save.
    #[tracing::instrument(skip(self, request), fields(plan = request.plan.as_str()))]
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<BusinessAccount, ServiceError> {
        request.validate()?;

        let password = Password::new(request.owner_password.clone());
        let hash = hash_credential(&password).map_err(|e| ServiceError::Credential(e.to_string()))?;

        let mut business = BusinessAccount::new(
            request.business_name.trim().to_string(),
            request.business_type,
            request.industry.trim().to_string(),
            request.fleet_size,
            request.plan,
            request.billing_period,
            request.management_structure,
        );
        let owner = UserAccount::new(
            business.id.clone(),
            request.owner_name.trim().to_string(),
            request.owner_email.trim().to_string(),
            hash,
            AccountType::Owner,
            None,
        );

        let mut work = store::begin(self.store.as_ref());
        work.insert(&business)?;
        work.insert(&owner)?;
        work.save().await.map_err(|e| {
            tracing::error!(business_id = %business.id, "Failed to persist sign-up: {}", e);
            e
        })?;

        tracing::info!(business_id = %business.id, user_id = %owner.id, "Business account created");
        business.add_user_account(owner);
        Ok(business)
    }

    pub async fn load_business(&self, business_id: &str) -> Result<BusinessAccount, ServiceError> {
        load_business(self.store.as_ref(), business_id).await
    }

    /// Verify a member's credential and stamp the login time.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(
        &self,
        business_id: &str,
        email: &str,
        password: &Password,
    ) -> Result<UserAccount, ServiceError> {
        let business = load_business(self.store.as_ref(), business_id).await?;
        if !business.is_active {
            return Err(ServiceError::BusinessInactive);
        }

        let mut user = business
            .find_member_by_email(email.trim())
            .cloned()
            .ok_or(ServiceError::InvalidCredentials)?;

        let valid = verify_credential(password, &user.credential_hash)
            .map_err(|e| ServiceError::Credential(e.to_string()))?;
        if !valid {
            tracing::warn!(user_id = %user.id, "Login rejected");
            return Err(ServiceError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(ServiceError::UserInactive);
        }

        user.record_login(Utc::now());
        let mut work = store::begin(self.store.as_ref());
        work.insert(&user)?;
        work.save().await?;

        tracing::info!(user_id = %user.id, account_type = user.account_type.as_str(), "Login succeeded");
        Ok(user)
    }

    /// Move the business to another plan. Seat limits are re-derived; existing members stay.
    #[tracing::instrument(skip(self))]
    pub async fn change_plan(
        &self,
        business_id: &str,
        actor_id: &str,
        plan: SubscriptionPlan,
        billing_period: BillingPeriod,
    ) -> Result<BusinessAccount, ServiceError> {
        let mut business = load_active_business(self.store.as_ref(), business_id).await?;
        let actor = active_member(&business, actor_id)?;
        if !actor.can_manage_subscription() {
            return Err(ServiceError::PermissionDenied(
                "subscription changes require manage_subscription".to_string(),
            ));
        }

        let previous = business.subscription_plan;
        business.change_plan(plan, billing_period);
        let mut work = store::begin(self.store.as_ref());
        work.insert(&business)?;
        work.save().await?;

        tracing::info!(
            business_id = %business.id,
            from = previous.as_str(),
            plan = plan.as_str(),
            "Subscription plan changed"
        );
        Ok(business)
    }

    #[tracing::instrument(skip(self))]
    pub async fn grant_permission(
        &self,
        business_id: &str,
        actor_id: &str,
        target_id: &str,
        permission: Permission,
    ) -> Result<UserAccount, ServiceError> {
        self.update_member(business_id, actor_id, target_id, |actor, target| {
            if !actor.has_permission(permission) {
                return Err(ServiceError::PermissionDenied(format!(
                    "cannot grant {} without holding it",
                    permission.key()
                )));
            }
            target.grant_permission(permission);
            Ok(())
        })
        .await
    }

    /// Remove an explicit grant. Role defaults are unaffected.
    #[tracing::instrument(skip(self))]
    pub async fn revoke_permission(
        &self,
        business_id: &str,
        actor_id: &str,
        target_id: &str,
        permission: Permission,
    ) -> Result<UserAccount, ServiceError> {
        self.update_member(business_id, actor_id, target_id, |_, target| {
            if !target.revoke_explicit_permission(permission) {
                tracing::debug!(permission = permission.key(), "No explicit grant to revoke");
            }
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self, department_access, location_access))]
    pub async fn set_access_scopes(
        &self,
        business_id: &str,
        actor_id: &str,
        target_id: &str,
        department_access: Vec<String>,
        location_access: Vec<String>,
    ) -> Result<UserAccount, ServiceError> {
        self.update_member(business_id, actor_id, target_id, |_, target| {
            target.set_department_access(AccessScope::from_list(department_access)?);
            target.set_location_access(AccessScope::from_list(location_access)?);
            Ok(())
        })
        .await
    }

    /// Deactivate the business and every member in one save. Nothing is deleted.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate_business(&self, business_id: &str) -> Result<BusinessAccount, ServiceError> {
        let mut business = load_business(self.store.as_ref(), business_id).await?;
        business.deactivate();

        let mut work = store::begin(self.store.as_ref());
        work.insert(&business)?;
        for user in &business.user_accounts {
            work.insert(user)?;
        }
        work.save().await?;

        tracing::info!(
            business_id = %business.id,
            members = business.user_accounts.len(),
            "Business account deactivated"
        );
        Ok(business)
    }

    /// Deactivate a single member. The owner is only deactivated with the business.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate_user(
        &self,
        business_id: &str,
        actor_id: &str,
        user_id: &str,
    ) -> Result<UserAccount, ServiceError> {
        self.update_member(business_id, actor_id, user_id, |_, target| {
            target.deactivate();
            Ok(())
        })
        .await
    }

    /// Load, authorize `actor` over `target`, apply `change`, persist `target`.
    async fn update_member<F>(
        &self,
        business_id: &str,
        actor_id: &str,
        target_id: &str,
        change: F,
    ) -> Result<UserAccount, ServiceError>
    where
        F: FnOnce(&UserAccount, &mut UserAccount) -> Result<(), ServiceError>,
    {
        let mut business = load_active_business(self.store.as_ref(), business_id).await?;
        let actor = active_member(&business, actor_id)?.clone();
        let target = business
            .member_mut(target_id)
            .ok_or(ServiceError::UserNotFound)?;

        authorize_management(&actor, target)?;
        change(&actor, target)?;

        let updated = target.clone();
        let mut work = store::begin(self.store.as_ref());
        work.insert(&updated)?;
        work.save().await?;

        tracing::info!(
            business_id = %business.id,
            actor_id = %actor.id,
            user_id = %updated.id,
            "Member updated"
        );
        Ok(updated)
    }
}

/// Load a business with its members attached, oldest first.
pub(crate) async fn load_business(
    store: &dyn RecordStore,
    business_id: &str,
) -> Result<BusinessAccount, ServiceError> {
    let mut business = store::fetch_one::<BusinessAccount>(store, business_id)
        .await?
        .ok_or(ServiceError::BusinessNotFound)?;

    let mut members = store::fetch_all::<UserAccount, _>(store, |u| u.business_id == business_id)
        .await?;
    members.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    business.user_accounts = members;

    tracing::debug!(
        business_id,
        members = business.user_accounts.len(),
        "Business loaded"
    );
    Ok(business)
}

pub(crate) async fn load_active_business(
    store: &dyn RecordStore,
    business_id: &str,
) -> Result<BusinessAccount, ServiceError> {
    let business = load_business(store, business_id).await?;
    if !business.is_active {
        return Err(ServiceError::BusinessInactive);
    }
    Ok(business)
}

pub(crate) fn active_member<'a>(
    business: &'a BusinessAccount,
    user_id: &str,
) -> Result<&'a UserAccount, ServiceError> {
    let user = business.member(user_id).ok_or(ServiceError::UserNotFound)?;
    if !user.is_active {
        return Err(ServiceError::UserInactive);
    }
    Ok(user)
}

/// An actor manages members of the account types it may invite, never itself.
fn authorize_management(actor: &UserAccount, target: &UserAccount) -> Result<(), ServiceError> {
    if actor.id == target.id {
        return Err(ServiceError::PermissionDenied(
            "members cannot change their own account".to_string(),
        ));
    }
    if !actor.can_invite_users() {
        return Err(ServiceError::PermissionDenied(
            "managing members requires manage_users".to_string(),
        ));
    }
    if !actor.account_type.can_invite(target.account_type) {
        return Err(ServiceError::PermissionDenied(format!(
            "{} accounts cannot manage {} accounts",
            actor.account_type.as_str(),
            target.account_type.as_str()
        )));
    }
    Ok(())
}

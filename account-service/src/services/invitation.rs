use std::sync::Arc;
use validator::Validate;

use super::accounts::{active_member, load_active_business};
use super::error::ServiceError;
use super::metrics;
use super::quota::QuotaGuard;
use super::store::{self, RecordStore};
use crate::models::{AccessScope, BusinessAccount, InviteUserRequest, UserAccount};
use crate::utils::{hash_credential, Password};

/// Adds members to a business on behalf of an existing member.
#[derive(Clone)]
pub struct InvitationService {
    store: Arc<dyn RecordStore>,
}

impl InvitationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(account_type = request.account_type.as_str())
    )]
    pub async fn invite(
        &self,
        business_id: &str,
        inviter_id: &str,
        request: InviteUserRequest,
    ) -> Result<UserAccount, ServiceError> {
        let result = self.try_invite(business_id, inviter_id, request).await;
        let outcome = match &result {
            Ok(_) => "created",
            Err(ServiceError::QuotaExceeded { .. }) | Err(ServiceError::FeatureNotInPlan { .. }) => {
                "quota"
            }
            Err(ServiceError::InvitationNotAllowed { .. }) | Err(ServiceError::PermissionDenied(_)) => {
                "denied"
            }
            Err(ServiceError::Validation(_)) | Err(ServiceError::Configuration(_)) => "invalid",
            Err(_) => "failed",
        };
        metrics::record_invitation(outcome);
        result
    }

    async fn try_invite(
        &self,
        business_id: &str,
        inviter_id: &str,
        request: InviteUserRequest,
    ) -> Result<UserAccount, ServiceError> {
        request.validate()?;

        let business = load_active_business(self.store.as_ref(), business_id).await?;
        let inviter = active_member(&business, inviter_id)?.clone();

        if !inviter.can_invite_users() {
            return Err(ServiceError::PermissionDenied(
                "inviting members requires manage_users".to_string(),
            ));
        }
        if !inviter.account_type.can_invite(request.account_type) {
            return Err(ServiceError::InvitationNotAllowed {
                inviter: inviter.account_type,
                invitee: request.account_type,
            });
        }
        if business.find_member_by_email(request.email.trim()).is_some() {
            return Err(ServiceError::EmailAlreadyRegistered);
        }

        QuotaGuard::ensure_member_capacity(&business, request.account_type)?;

        let user = build_member(&business, &inviter, &request)?;

        let mut work = store::begin(self.store.as_ref());
        work.insert(&user)?;
        work.save().await?;

        tracing::info!(
            business_id = %business.id,
            user_id = %user.id,
            invited_by = %inviter.id,
            "Member invited"
        );
        Ok(user)
    }
}

fn build_member(
    business: &BusinessAccount,
    inviter: &UserAccount,
    request: &InviteUserRequest,
) -> Result<UserAccount, ServiceError> {
    let hash = hash_credential(&Password::new(request.password.clone()))
        .map_err(|e| ServiceError::Credential(e.to_string()))?;

    let mut user = UserAccount::new(
        business.id.clone(),
        request.full_name.trim().to_string(),
        request.email.trim().to_string(),
        hash,
        request.account_type,
        Some(inviter.id.clone()),
    );

    user.set_explicit_permission_keys(request.extra_permissions.as_slice())?;
    if let Some(extra) = user
        .explicit_permissions
        .iter()
        .find(|p| !inviter.has_permission(**p))
    {
        return Err(ServiceError::PermissionDenied(format!(
            "cannot grant {} without holding it",
            extra.key()
        )));
    }

    user.set_department_access(AccessScope::from_list(request.department_access.clone())?);
    user.set_location_access(AccessScope::from_list(request.location_access.clone())?);
    Ok(user)
}

//! User account model - a member of a business account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::access_scope::AccessScope;
use super::account_type::AccountType;
use super::permission::Permission;
use super::sync::SyncMetadata;
use crate::services::store::Document;
use crate::services::ServiceError;
use crate::utils::CredentialHash;

/// Member record. Never hard-deleted; `is_active` models removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub business_id: String,
    pub full_name: String,
    pub email: String,
    pub credential_hash: CredentialHash,
    pub account_type: AccountType,
    /// Grants beyond the role defaults. Never used to revoke a default.
    #[serde(default)]
    pub explicit_permissions: BTreeSet<Permission>,
    #[serde(default)]
    pub department_access: AccessScope,
    #[serde(default)]
    pub location_access: AccessScope,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Id of the member who sent the invitation; lookup only.
    pub invited_by: Option<String>,
    #[serde(default)]
    pub sync: SyncMetadata,
}

impl UserAccount {
    pub fn new(
        business_id: String,
        full_name: String,
        email: String,
        credential_hash: CredentialHash,
        account_type: AccountType,
        invited_by: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            full_name,
            email: email.to_lowercase(),
            credential_hash,
            account_type,
            explicit_permissions: BTreeSet::new(),
            department_access: AccessScope::Unrestricted,
            location_access: AccessScope::Unrestricted,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
            invited_by,
            sync: SyncMetadata::default(),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.explicit_permissions.contains(&permission)
            || self.account_type.grants_by_default(permission)
    }

    /// Role defaults unioned with explicit grants.
    pub fn effective_permissions(&self) -> BTreeSet<Permission> {
        let mut permissions = self.account_type.default_permissions();
        permissions.extend(self.explicit_permissions.iter().copied());
        permissions
    }

    pub fn can_access_department(&self, department: &str) -> bool {
        if self.account_type == AccountType::Owner {
            return true;
        }
        self.department_access.allows(department)
    }

    pub fn can_access_location(&self, location: &str) -> bool {
        if self.account_type == AccountType::Owner {
            return true;
        }
        self.location_access.allows(location)
    }

    pub fn can_invite_users(&self) -> bool {
        self.has_permission(Permission::ManageUsers) && self.account_type != AccountType::Technician
    }

    pub fn can_manage_subscription(&self) -> bool {
        self.account_type == AccountType::Owner
            || self.has_permission(Permission::ManageSubscription)
    }

    /// Returns `false` when the grant was already present.
    pub fn grant_permission(&mut self, permission: Permission) -> bool {
        self.explicit_permissions.insert(permission)
    }

    /// Removes an explicit grant only; role defaults stay in effect.
    pub fn revoke_explicit_permission(&mut self, permission: Permission) -> bool {
        self.explicit_permissions.remove(&permission)
    }

    /// Replace the explicit grants from persisted keys. Nothing changes if any key is unknown.
    pub fn set_explicit_permission_keys<S: AsRef<str>>(
        &mut self,
        keys: &[S],
    ) -> Result<(), ServiceError> {
        let permissions = keys
            .iter()
            .map(|k| Permission::parse(k.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        self.explicit_permissions = permissions;
        Ok(())
    }

    pub fn set_department_access(&mut self, scope: AccessScope) {
        self.department_access = scope;
    }

    pub fn set_location_access(&mut self, scope: AccessScope) {
        self.location_access = scope;
    }

    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = Some(at);
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn is_owner(&self) -> bool {
        self.account_type == AccountType::Owner
    }
}

impl Document for UserAccount {
    const COLLECTION: &'static str = "user_accounts";

    fn document_id(&self) -> &str {
        &self.id
    }
}

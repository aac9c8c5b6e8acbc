//! Invitation request - input to the member invitation workflow.

use serde::Deserialize;
use validator::Validate;

use super::account_type::AccountType;

/// Request to add a member to a business account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteUserRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub account_type: AccountType,
    /// Initial credential; hashed before storage.
    #[validate(length(min = 8))]
    pub password: String,
    /// Persisted permission keys granted beyond the role defaults.
    #[serde(default)]
    pub extra_permissions: Vec<String>,
    #[serde(default)]
    pub department_access: Vec<String>,
    #[serde(default)]
    pub location_access: Vec<String>,
}

impl InviteUserRequest {
    pub fn new(full_name: &str, email: &str, account_type: AccountType, password: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            email: email.to_string(),
            account_type,
            password: password.to_string(),
            extra_permissions: Vec::new(),
            department_access: Vec::new(),
            location_access: Vec::new(),
        }
    }
}

pub mod access_scope;
pub mod account_type;
pub mod business_account;
pub mod financial_visibility;
pub mod invitation;
pub mod permission;
pub mod subscription;
pub mod sync;
pub mod user_account;

pub use access_scope::AccessScope;
pub use account_type::AccountType;
pub use business_account::{
    BusinessAccount, BusinessType, FleetSize, ManagementStructure, SignUpRequest,
};
pub use financial_visibility::{
    FinancialRole, FinancialVisibilitySetting, FinancialVisibilityUpdate,
};
pub use invitation::InviteUserRequest;
pub use permission::{Permission, PermissionCategory};
pub use subscription::{BillingPeriod, Seat, SubscriptionLimitations, SubscriptionPlan};
pub use sync::{SyncMetadata, SyncStatus};
pub use user_account::UserAccount;

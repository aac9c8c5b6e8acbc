//! Seat and feature enforcement against the plan a business is on.
//!
//! Checks run at the point of creation or invitation. Members already over a
//! lowered limit are left alone.

use super::error::ServiceError;
use super::metrics;
use crate::models::{AccountType, BusinessAccount, Seat};

pub const CAPABILITY_CREATE_MANAGERS: &str = "create_managers";
pub const CAPABILITY_REPORTS: &str = "reports";
pub const CAPABILITY_INTEGRATIONS: &str = "integrations";

pub struct QuotaGuard;

impl QuotaGuard {
    /// Limit stored on the business for `seat`.
    pub fn limit_for(business: &BusinessAccount, seat: Seat) -> u32 {
        match seat {
            Seat::Vehicle => business.max_vehicles,
            Seat::Manager => business.max_managers,
            Seat::Technician => business.max_technicians,
            Seat::Location => business.max_locations,
        }
    }

    /// Fails when adding one more unit to `current` would exceed the limit.
    pub fn ensure_capacity(
        business: &BusinessAccount,
        seat: Seat,
        current: u32,
    ) -> Result<(), ServiceError> {
        let limit = Self::limit_for(business, seat);
        let requested = current.saturating_add(1);
        if requested > limit {
            tracing::warn!(
                business_id = %business.id,
                seat = seat.as_str(),
                limit,
                requested,
                "Seat limit reached"
            );
            metrics::record_quota_rejection(seat.as_str());
            return Err(ServiceError::QuotaExceeded {
                seat,
                limit,
                requested,
            });
        }
        Ok(())
    }

    pub fn ensure_feature(business: &BusinessAccount, feature: &str) -> Result<(), ServiceError> {
        let limits = business.limitations();
        let allowed = match feature {
            CAPABILITY_CREATE_MANAGERS => limits.can_create_managers,
            CAPABILITY_REPORTS => limits.can_access_reports,
            CAPABILITY_INTEGRATIONS => limits.can_use_integrations,
            other => limits.has_feature(other),
        };
        if allowed {
            Ok(())
        } else {
            Err(ServiceError::FeatureNotInPlan {
                plan: business.subscription_plan,
                feature: feature.to_string(),
            })
        }
    }

    /// Room for one more active member of `account_type`.
    pub fn ensure_member_capacity(
        business: &BusinessAccount,
        account_type: AccountType,
    ) -> Result<(), ServiceError> {
        let current = business.active_members_of(account_type);

        if let Some(max) = account_type.max_users() {
            if current >= max {
                return Err(match account_type {
                    AccountType::Owner => ServiceError::OwnerAlreadyExists,
                    _ => ServiceError::Configuration(format!(
                        "{} accounts are limited to {}",
                        account_type.as_str(),
                        max
                    )),
                });
            }
        }

        if account_type == AccountType::Manager {
            Self::ensure_feature(business, CAPABILITY_CREATE_MANAGERS)?;
        }

        match Seat::for_account_type(account_type) {
            Some(seat) => Self::ensure_capacity(business, seat, current),
            None => Ok(()),
        }
    }
}

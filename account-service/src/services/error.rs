use fleet_core::error::AppError;
use thiserror::Error;

use crate::models::{AccountType, Seat, SubscriptionPlan};

/// Failure reported by the durable record collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O failure: {0}")]
    Io(String),

    #[error("Store constraint violated: {0}")]
    Constraint(String),

    #[error("Failed to encode document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored {collection} document {id} could not be decoded: {source}")]
    Decode {
        collection: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Quota exceeded for {seat}: limit {limit}, requested {requested}")]
    QuotaExceeded {
        seat: Seat,
        limit: u32,
        requested: u32,
    },

    #[error("Feature '{feature}' is not included in the {plan} plan")]
    FeatureNotInPlan {
        plan: SubscriptionPlan,
        feature: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{} accounts cannot invite {} accounts", .inviter.as_str(), .invitee.as_str())]
    InvitationNotAllowed {
        inviter: AccountType,
        invitee: AccountType,
    },

    #[error("Business already has an owner")]
    OwnerAlreadyExists,

    #[error("Email already registered in this business")]
    EmailAlreadyRegistered,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Business account is inactive")]
    BusinessInactive,

    #[error("User account is inactive")]
    UserInactive,

    #[error("Business not found")]
    BusinessNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Credential error: {0}")]
    Credential(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Configuration(_) => AppError::ConfigError(anyhow::anyhow!(message)),
            ServiceError::QuotaExceeded { .. } | ServiceError::FeatureNotInPlan { .. } => {
                AppError::QuotaExceeded(anyhow::anyhow!(message))
            }
            // Corrupt records do not heal on retry.
            ServiceError::Store(e @ StoreError::Decode { .. }) => {
                AppError::InternalError(anyhow::Error::new(e))
            }
            ServiceError::Store(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::InvitationNotAllowed { .. } | ServiceError::PermissionDenied(_) => {
                AppError::Forbidden(anyhow::anyhow!(message))
            }
            ServiceError::OwnerAlreadyExists | ServiceError::EmailAlreadyRegistered => {
                AppError::Conflict(anyhow::anyhow!(message))
            }
            ServiceError::BusinessInactive | ServiceError::UserInactive => {
                AppError::Forbidden(anyhow::anyhow!(message))
            }
            ServiceError::BusinessNotFound | ServiceError::UserNotFound => {
                AppError::NotFound(anyhow::anyhow!(message))
            }
            ServiceError::InvalidCredentials => AppError::Unauthorized(anyhow::anyhow!(message)),
            ServiceError::Validation(e) => AppError::ValidationError(e),
            ServiceError::Credential(_) => AppError::InternalError(anyhow::anyhow!(message)),
        }
    }
}

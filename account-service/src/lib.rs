//! Business accounts, member roles, permissions and subscription limits.
//!
//! Entities and policies live in [`models`]; workflows that load and persist
//! them through a [`services::RecordStore`] live in [`services`].

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use fleet_core::error::AppError;
use std::sync::Arc;

use crate::config::AccountConfig;
use crate::services::{
    AccountService, FinancialVisibilityService, InvitationService, RecordStore,
};

/// Services wired against a single record store.
#[derive(Clone)]
pub struct AppState {
    pub config: AccountConfig,
    pub store: Arc<dyn RecordStore>,
    pub accounts: AccountService,
    pub invitations: InvitationService,
    pub financial: FinancialVisibilityService,
}

impl AppState {
    pub fn new(config: AccountConfig, store: Arc<dyn RecordStore>) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            invitations: InvitationService::new(store.clone()),
            financial: FinancialVisibilityService::new(
                store.clone(),
                config.financial_visibility.clone(),
            ),
            config,
            store,
        }
    }
}

/// Install logging and metrics for the process.
pub fn init(config: &AccountConfig) {
    fleet_core::observability::init_tracing(
        &config.service_name,
        &config.common.log_level,
        config.common.log_json,
    );
    services::metrics::init_metrics();
}

pub async fn health_check(state: &AppState) -> Result<serde_json::Value, AppError> {
    state.store.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Record store health check failed");
        AppError::DatabaseError(anyhow::Error::new(e))
    })?;

    Ok(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "environment": format!("{:?}", state.config.common.environment),
        "checks": {
            "store": "up"
        }
    }))
}

use std::sync::Arc;
use validator::Validate;

use super::error::ServiceError;
use super::store::{self, RecordStore};
use crate::config::FinancialVisibilityDefaults;
use crate::models::{
    BusinessAccount, FinancialRole, FinancialVisibilitySetting, FinancialVisibilityUpdate,
};

/// Per-tenant financial visibility record, created on first access.
#[derive(Clone)]
pub struct FinancialVisibilityService {
    store: Arc<dyn RecordStore>,
    defaults: FinancialVisibilityDefaults,
}

impl FinancialVisibilityService {
    pub fn new(store: Arc<dyn RecordStore>, defaults: FinancialVisibilityDefaults) -> Self {
        Self { store, defaults }
    }

    #[tracing::instrument(skip(self))]
    pub async fn settings(&self, business_id: &str) -> Result<FinancialVisibilitySetting, ServiceError> {
        if let Some(existing) =
            store::fetch_one::<FinancialVisibilitySetting>(self.store.as_ref(), business_id).await?
        {
            return Ok(existing);
        }

        if store::fetch_one::<BusinessAccount>(self.store.as_ref(), business_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::BusinessNotFound);
        }

        let setting = FinancialVisibilitySetting::with_defaults(business_id.to_string(), &self.defaults);
        let mut work = store::begin(self.store.as_ref());
        work.insert(&setting)?;
        work.save().await?;

        tracing::info!(business_id, "Financial visibility settings created with defaults");
        Ok(setting)
    }

    /// Apply `update` and stamp `by_user_id`. The caller decides who may update.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_settings(
        &self,
        business_id: &str,
        by_user_id: &str,
        update: FinancialVisibilityUpdate,
    ) -> Result<FinancialVisibilitySetting, ServiceError> {
        update.validate()?;

        let mut setting = self.settings(business_id).await?;
        setting.apply_update(&update, by_user_id);

        let mut work = store::begin(self.store.as_ref());
        work.insert(&setting)?;
        work.save().await?;

        tracing::info!(business_id, updated_by = by_user_id, "Financial visibility settings updated");
        Ok(setting)
    }

    pub async fn can_user_see_financial_data(
        &self,
        business_id: &str,
        role: FinancialRole,
    ) -> Result<bool, ServiceError> {
        Ok(self.settings(business_id).await?.can_user_see_financial_data(role))
    }

    pub async fn can_user_see_detailed_reports(
        &self,
        business_id: &str,
        role: FinancialRole,
    ) -> Result<bool, ServiceError> {
        Ok(self.settings(business_id).await?.can_user_see_detailed_reports(role))
    }

    pub async fn can_user_see_analytics(
        &self,
        business_id: &str,
        role: FinancialRole,
    ) -> Result<bool, ServiceError> {
        Ok(self.settings(business_id).await?.can_user_see_analytics(role))
    }
}

//! Cloud sync bookkeeping carried by syncable records.
//!
//! Only the storage collaborator reads or writes these fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Unsynced,
    Pending,
    Synced,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Unsynced => "unsynced",
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
            SyncStatus::Failed => "failed",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            SyncStatus::Unsynced => 0,
            SyncStatus::Pending => 1,
            SyncStatus::Synced => 2,
            SyncStatus::Failed => 3,
        }
    }

    pub fn from_code(value: i32) -> Self {
        match value {
            1 => SyncStatus::Pending,
            2 => SyncStatus::Synced,
            3 => SyncStatus::Failed,
            _ => SyncStatus::Unsynced,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMetadata {
    pub record_id: Option<String>,
    pub status: SyncStatus,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl SyncMetadata {
    pub fn mark_pending(&mut self) {
        self.status = SyncStatus::Pending;
    }

    pub fn mark_synced(&mut self, record_id: impl Into<String>, at: DateTime<Utc>) {
        self.record_id = Some(record_id.into());
        self.status = SyncStatus::Synced;
        self.last_synced_at = Some(at);
    }

    pub fn mark_failed(&mut self) {
        self.status = SyncStatus::Failed;
    }
}

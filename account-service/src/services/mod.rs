//! Services layer for account-service.
//!
//! Workflows that load entities from the record store, consult the
//! permission and plan policies, and persist the result.

mod accounts;
pub mod error;
mod financial;
mod invitation;
pub mod metrics;
pub mod quota;
pub mod store;

pub use accounts::AccountService;
pub use error::{ServiceError, StoreError};
pub use financial::FinancialVisibilityService;
pub use invitation::InvitationService;
pub use quota::QuotaGuard;
pub use store::{Document, MemoryStore, RecordStore, StagedWrite, UnitOfWork};

//! Access scope - department/location restriction for a member.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::services::ServiceError;

/// Either unrestricted, or limited to a named set.
///
/// Persisted as a plain list where an empty list means unrestricted, so
/// `RestrictedTo` never holds an empty set. Blank names are rejected rather
/// than dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum AccessScope {
    #[default]
    Unrestricted,
    RestrictedTo(BTreeSet<String>),
}

impl AccessScope {
    pub fn from_list<I, S>(items: I) -> Result<Self, ServiceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for item in items {
            let name: String = item.into();
            if name.trim().is_empty() {
                return Err(ServiceError::Configuration(
                    "Access scope entries must not be blank".to_string(),
                ));
            }
            set.insert(name);
        }
        if set.is_empty() {
            Ok(AccessScope::Unrestricted)
        } else {
            Ok(AccessScope::RestrictedTo(set))
        }
    }

    pub fn allows(&self, name: &str) -> bool {
        match self {
            AccessScope::Unrestricted => true,
            AccessScope::RestrictedTo(set) => set.contains(name),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, AccessScope::Unrestricted)
    }

    pub fn to_list(&self) -> Vec<String> {
        match self {
            AccessScope::Unrestricted => Vec::new(),
            AccessScope::RestrictedTo(set) => set.iter().cloned().collect(),
        }
    }
}

impl TryFrom<Vec<String>> for AccessScope {
    type Error = ServiceError;

    fn try_from(items: Vec<String>) -> Result<Self, Self::Error> {
        AccessScope::from_list(items)
    }
}

impl From<AccessScope> for Vec<String> {
    fn from(scope: AccessScope) -> Self {
        scope.to_list()
    }
}

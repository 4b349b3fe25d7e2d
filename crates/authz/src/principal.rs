//! Principal snapshot and request metadata.

use serde::{Deserialize, Serialize};

use storekeep_catalog::{RoleName, UserAccount};
use storekeep_core::{StoreId, UserId};

use crate::error::AuthzError;

/// Snapshot of the authenticated caller, as supplied by the authentication
/// collaborator before any gate runs.
///
/// The decision core reads exactly three things from a caller: role name,
/// active flag and store assignment. Role and permission state is re-resolved
/// through the catalogs per decision, never cached here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    /// Role carried by name; resolved against the role catalog per decision.
    pub role: RoleName,
    pub is_active: bool,
    /// Store partition the caller is assigned to, if any.
    pub store: Option<StoreId>,
}

impl Principal {
    pub fn new(id: UserId, role: RoleName) -> Self {
        Self {
            id,
            role,
            is_active: true,
            store: None,
        }
    }

    /// Snapshot a directory record into a principal.
    pub fn from_account(account: &UserAccount) -> Self {
        Self {
            id: account.id,
            role: account.role.clone(),
            is_active: account.is_active,
            store: account.store,
        }
    }

    pub fn with_store(mut self, store: StoreId) -> Self {
        self.store = Some(store);
        self
    }

    /// The single superuser predicate.
    ///
    /// Every gate's administrator bypass goes through here; the check is
    /// defined once rather than re-implemented per gate.
    pub fn is_superuser(&self) -> bool {
        self.role == RoleName::ADMIN
    }

    /// Disabled accounts fail every gate, closed.
    pub(crate) fn ensure_active(&self) -> Result<(), AuthzError> {
        if self.is_active {
            Ok(())
        } else {
            Err(AuthzError::AccountDisabled)
        }
    }
}

/// Request metadata evaluated alongside the principal snapshot.
///
/// Both fields are optional: most operations target neither a specific user
/// account nor a store partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Account the operation targets, when it targets one.
    pub target_user: Option<UserId>,
    /// Store partition the operation names, when it names one.
    pub target_store: Option<StoreId>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_user(mut self, user: UserId) -> Self {
        self.target_user = Some(user);
        self
    }

    pub fn target_store(mut self, store: StoreId) -> Self {
        self.target_store = Some(store);
        self
    }
}

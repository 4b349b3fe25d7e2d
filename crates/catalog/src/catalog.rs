//! Catalog collaborator contracts.
//!
//! Gates resolve role/permission state through these traits on every call.
//! Implementations are expected to read current state; the decision core never
//! assumes catalog contents are cached on the principal.

use thiserror::Error;

use storekeep_core::{DomainError, PermissionId, RoleId, UserId};

use crate::permission::Permission;
use crate::role::{Role, RoleName};
use crate::user::UserAccount;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog failure.
///
/// `Storage` is an infrastructure fault, not attributable to the caller; the
/// decision core surfaces it distinctly and fails closed rather than treating
/// it as an allow or a permission denial.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Backing storage failed (connection loss, poisoned lock, ...).
    #[error("catalog storage failure: {0}")]
    Storage(String),

    /// A deterministic domain failure (validation, conflict, invariant).
    #[error("{0}")]
    Domain(#[from] DomainError),
}

impl CatalogError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Read surface over permission records.
pub trait PermissionCatalog: Send + Sync {
    fn find_by_id(&self, id: &PermissionId) -> CatalogResult<Option<Permission>>;

    /// Look up by globally unique name.
    fn find_by_name(&self, name: &str) -> CatalogResult<Option<Permission>>;
}

/// Read/write surface over role records.
pub trait RoleCatalog: Send + Sync {
    fn find_by_id(&self, id: &RoleId) -> CatalogResult<Option<Role>>;

    /// Look up by unique name. This is the resolution step behind every
    /// granular permission decision: a missing role means "no permissions".
    fn find_by_name(&self, name: &str) -> CatalogResult<Option<Role>>;

    /// Resolve the permission records granted to `role` (the role→permission
    /// join). Grants pointing at deleted permission records are skipped.
    fn permissions_for(&self, role: &Role) -> CatalogResult<Vec<Permission>>;

    /// Persist `role`, recomputing its `user_count` cache from the directory.
    /// Returns the record as persisted.
    fn save(&self, role: Role) -> CatalogResult<Role>;
}

/// Read surface over user accounts.
pub trait UserDirectory: Send + Sync {
    fn find_by_id(&self, id: &UserId) -> CatalogResult<Option<UserAccount>>;

    /// Count accounts that are active **and** carry the admin role name.
    ///
    /// Used by the deletion invariant. The count-then-decide sequence built on
    /// top of it is not transactional; see DESIGN.md for the accepted race.
    fn count_active_admins(&self) -> CatalogResult<usize>;
}

/// Count helper shared by directory implementations.
pub(crate) fn is_active_admin(account: &UserAccount) -> bool {
    account.is_active && account.role == RoleName::ADMIN
}

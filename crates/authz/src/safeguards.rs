//! Hand-coded safety gates: mass mutation and account removal.

use storekeep_catalog::{RoleName, UserDirectory};
use storekeep_core::UserId;

use crate::error::AuthzError;
use crate::principal::Principal;

/// Coarse bulk-mutation gate, hard-pinned to role names.
///
/// Bulk authority never consults permission records; this is deliberately
/// coarser than the granular matrix (see DESIGN.md).
#[derive(Debug, Clone, Copy, Default)]
pub struct BulkOperationGate;

impl BulkOperationGate {
    pub fn allow(&self, principal: &Principal) -> Result<(), AuthzError> {
        principal.ensure_active()?;

        if principal.role == RoleName::MANAGER || principal.role == RoleName::ADMIN {
            Ok(())
        } else {
            Err(AuthzError::InsufficientRole {
                required: RoleName::MANAGER,
                actual: principal.role.clone(),
            })
        }
    }
}

/// Account-removal gate carrying the last-administrator invariant.
pub struct DeletionInvariantGate<'d> {
    users: &'d dyn UserDirectory,
}

impl<'d> DeletionInvariantGate<'d> {
    pub fn new(users: &'d dyn UserDirectory) -> Self {
        Self { users }
    }

    /// Decide whether `principal` may remove `target_user`.
    ///
    /// The last-administrator invariant is evaluated first and overrides every
    /// other rule, including self-deletion: no caller may remove the final
    /// active admin account. After that, self-deletion is always permitted
    /// (even for staff) and anything else requires the admin role.
    ///
    /// The count-then-decide sequence is **not** transactional against
    /// concurrent deletions; two racing last-admin deletions can both read a
    /// count of 2. Accepted limitation, documented in DESIGN.md.
    pub fn allow(&self, principal: &Principal, target_user: &UserId) -> Result<(), AuthzError> {
        principal.ensure_active()?;

        if let Some(target) = self.users.find_by_id(target_user)? {
            if target.is_admin() && self.users.count_active_admins()? <= 1 {
                return Err(AuthzError::LastAdminProtected);
            }
        }

        if *target_user == principal.id {
            return Ok(());
        }

        if principal.is_superuser() {
            Ok(())
        } else {
            Err(AuthzError::InsufficientRole {
                required: RoleName::ADMIN,
                actual: principal.role.clone(),
            })
        }
    }
}

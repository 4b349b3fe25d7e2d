//! Coarse role-hierarchy gate.
//!
//! A fixed three-tier ranking over role names. This ranking is independent of
//! `Role.level` in the catalog; the two coexist unreconciled, and DESIGN.md
//! explains why they are deliberately not merged.

use storekeep_catalog::RoleName;
use storekeep_core::UserId;

use crate::error::AuthzError;
use crate::principal::Principal;

/// Fixed hierarchy weight for a role name. Unknown names weigh 0 and
/// therefore satisfy nothing.
pub fn hierarchy_weight(role: &RoleName) -> u8 {
    match role.as_str() {
        "staff" => 1,
        "manager" => 2,
        "admin" => 3,
        _ => 0,
    }
}

/// Minimum weight required to operate on another user's account.
const OTHER_USER_MIN_WEIGHT: u8 = 2;

/// Coarse allow/deny over two role names.
///
/// Pure, constant-time policy: never touches the catalogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleHierarchyGate;

impl RoleHierarchyGate {
    /// Allow iff the caller's weight reaches the required role's weight.
    ///
    /// `target_user` is the account the request targets, when it targets one.
    /// Operations aimed at **another** account additionally require manager
    /// weight even when the base check passed, so staff cannot reach other
    /// users' records through staff-level routes.
    pub fn allow(
        &self,
        principal: &Principal,
        required: &RoleName,
        target_user: Option<&UserId>,
    ) -> Result<(), AuthzError> {
        principal.ensure_active()?;
        if principal.is_superuser() {
            return Ok(());
        }

        let weight = hierarchy_weight(&principal.role);
        if weight < hierarchy_weight(required) {
            return Err(AuthzError::InsufficientRole {
                required: required.clone(),
                actual: principal.role.clone(),
            });
        }

        if let Some(target) = target_user {
            if *target != principal.id && weight < OTHER_USER_MIN_WEIGHT {
                return Err(AuthzError::InsufficientRole {
                    required: RoleName::MANAGER,
                    actual: principal.role.clone(),
                });
            }
        }

        Ok(())
    }
}

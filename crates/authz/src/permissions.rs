//! Granular permission gates: exact resource×action matching.
//!
//! Both gates resolve the caller's role by name against the role catalog on
//! every call; catalog state is never assumed cached on the principal. These
//! checks are strictly additive over the hierarchy gate: there is no wildcard
//! and no hierarchy fallback.

use storekeep_catalog::{PermissionAction, RoleCatalog};

use crate::error::AuthzError;
use crate::principal::Principal;

/// Exact resource+action lookup against the caller's resolved role.
pub struct GranularPermissionGate<'c> {
    roles: &'c dyn RoleCatalog,
}

impl<'c> GranularPermissionGate<'c> {
    pub fn new(roles: &'c dyn RoleCatalog) -> Self {
        Self { roles }
    }

    pub fn allow(
        &self,
        principal: &Principal,
        resource: &str,
        action: PermissionAction,
    ) -> Result<(), AuthzError> {
        principal.ensure_active()?;
        if principal.is_superuser() {
            return Ok(());
        }

        if holds_grant(self.roles, principal, resource, action, false)? {
            Ok(())
        } else {
            Err(AuthzError::PermissionDenied {
                resource: resource.to_string(),
                action,
            })
        }
    }
}

/// Verb-driven variant: derives the action from an HTTP-style method.
pub struct ResourceMethodGate<'c> {
    roles: &'c dyn RoleCatalog,
}

impl<'c> ResourceMethodGate<'c> {
    pub fn new(roles: &'c dyn RoleCatalog) -> Self {
        Self { roles }
    }

    /// Allow iff the caller's role holds an active grant for the derived
    /// action, or an active `manage` grant on the same resource. `manage` is
    /// a super-action scoped to one resource, not a global wildcard.
    pub fn allow(
        &self,
        principal: &Principal,
        resource: &str,
        method: &str,
    ) -> Result<(), AuthzError> {
        let Some(action) = action_for_method(method) else {
            return Err(AuthzError::InvalidMethod(method.to_string()));
        };

        principal.ensure_active()?;
        if principal.is_superuser() {
            return Ok(());
        }

        if holds_grant(self.roles, principal, resource, action, true)? {
            Ok(())
        } else {
            Err(AuthzError::PermissionDenied {
                resource: resource.to_string(),
                action,
            })
        }
    }
}

/// Fixed verb table. Methods are matched verbatim (HTTP verbs are uppercase
/// on the wire); anything unmapped is a client error upstream of any
/// permission decision.
pub fn action_for_method(method: &str) -> Option<PermissionAction> {
    match method {
        "GET" => Some(PermissionAction::Read),
        "POST" => Some(PermissionAction::Create),
        "PUT" | "PATCH" => Some(PermissionAction::Update),
        "DELETE" => Some(PermissionAction::Delete),
        _ => None,
    }
}

/// Shared matching step behind both gates: resolve the role by name, then
/// scan its grants. A missing role resolves to "no permissions" and denies.
fn holds_grant(
    roles: &dyn RoleCatalog,
    principal: &Principal,
    resource: &str,
    action: PermissionAction,
    accept_manage: bool,
) -> Result<bool, AuthzError> {
    let Some(role) = roles.find_by_name(principal.role.as_str())? else {
        return Ok(false);
    };

    let grants = roles.permissions_for(&role)?;
    Ok(grants
        .iter()
        .any(|p| p.grants(resource, action) || (accept_manage && p.grants_manage(resource))))
}

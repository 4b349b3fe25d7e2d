//! Decision explanation for audit and debug surfaces.
//!
//! Answers "why was this request allowed or denied?" using the same
//! role-resolution path the granular gates use, with enough detail for an
//! operator to correct the grant setup.

use serde::Serialize;

use storekeep_catalog::{PermissionAction, RoleCatalog, RoleName};
use storekeep_core::{StoreId, UserId};

use crate::error::AuthzError;
use crate::principal::Principal;

/// Detailed explanation of a granular permission decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionExplanation {
    /// The resource:action pair that was checked.
    pub resource: String,
    pub action: PermissionAction,

    /// Whether access would be granted.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// The principal's state at decision time.
    pub principal: PrincipalState,

    /// If denied, what was missing.
    pub denial: Option<DenialReason>,
}

/// Principal state as seen by the decision.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalState {
    pub principal_id: UserId,
    pub role: RoleName,
    pub is_active: bool,
    pub store: Option<StoreId>,
    /// Names of the active grants the resolved role holds (sorted).
    pub held_permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    AccountDisabled,
    UnknownRole,
    MissingPermission,
    InactivePermission,
}

/// Explain a granular permission decision without enforcing it.
///
/// Catalog faults propagate as `InternalLookupFailure`; an explanation is
/// never fabricated from partial state.
pub fn explain_permission(
    roles: &dyn RoleCatalog,
    principal: &Principal,
    resource: &str,
    action: PermissionAction,
) -> Result<DecisionExplanation, AuthzError> {
    let base_state = |held: Vec<String>| PrincipalState {
        principal_id: principal.id,
        role: principal.role.clone(),
        is_active: principal.is_active,
        store: principal.store,
        held_permissions: held,
    };

    if !principal.is_active {
        return Ok(DecisionExplanation {
            resource: resource.to_string(),
            action,
            granted: false,
            reason: "account is disabled".to_string(),
            principal: base_state(Vec::new()),
            denial: Some(DenialReason {
                kind: DenialKind::AccountDisabled,
                message: "disabled accounts fail every gate".to_string(),
                suggestions: vec!["re-activate the account before retrying".to_string()],
            }),
        });
    }

    if principal.is_superuser() {
        return Ok(DecisionExplanation {
            resource: resource.to_string(),
            action,
            granted: true,
            reason: "administrator bypass".to_string(),
            principal: base_state(Vec::new()),
            denial: None,
        });
    }

    let Some(role) = roles.find_by_name(principal.role.as_str())? else {
        return Ok(DecisionExplanation {
            resource: resource.to_string(),
            action,
            granted: false,
            reason: format!(
                "role '{}' does not resolve in the catalog",
                principal.role
            ),
            principal: base_state(Vec::new()),
            denial: Some(DenialReason {
                kind: DenialKind::UnknownRole,
                message: "an unresolved role grants no permissions".to_string(),
                suggestions: vec![
                    "check whether the role was renamed after this account was created"
                        .to_string(),
                    format!("create or restore a role named '{}'", principal.role),
                ],
            }),
        });
    };

    let grants = roles.permissions_for(&role)?;

    let mut held: Vec<String> = grants
        .iter()
        .filter(|p| p.is_active)
        .map(|p| p.name.clone())
        .collect();
    held.sort();

    if let Some(matched) = grants.iter().find(|p| p.grants(resource, action)) {
        return Ok(DecisionExplanation {
            resource: resource.to_string(),
            action,
            granted: true,
            reason: format!("role '{}' holds '{}'", role.name, matched.name),
            principal: base_state(held),
            denial: None,
        });
    }

    // Distinguish "the grant exists but is switched off" from a plain miss.
    let inactive_match = grants
        .iter()
        .find(|p| !p.is_active && p.resource == resource && p.action == action);

    let denial = if let Some(inactive) = inactive_match {
        DenialReason {
            kind: DenialKind::InactivePermission,
            message: format!("permission '{}' matches but is inactive", inactive.name),
            suggestions: vec![format!("re-activate permission '{}'", inactive.name)],
        }
    } else {
        DenialReason {
            kind: DenialKind::MissingPermission,
            message: format!("no grant for '{resource}:{action}'"),
            suggestions: vec![
                format!("grant '{resource}:{action}' to role '{}'", role.name),
                "assign the caller a role that already holds this grant".to_string(),
            ],
        }
    };

    Ok(DecisionExplanation {
        resource: resource.to_string(),
        action,
        granted: false,
        reason: format!(
            "role '{}' holds no active grant for '{resource}:{action}'",
            role.name
        ),
        principal: base_state(held),
        denial: Some(denial),
    })
}

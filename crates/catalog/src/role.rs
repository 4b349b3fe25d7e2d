//! Role records: named permission bundles with a catalog rank.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use storekeep_core::{DomainError, DomainResult, Entity, PermissionId, RoleId};

use crate::permission::{Permission, PermissionAction, PermissionCategory};

/// Catalog rank bounds for a role record.
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;

/// Role name: the string-typed reference user accounts carry.
///
/// Accounts reference roles **by name**, not by id; renaming a role silently
/// orphans the accounts still carrying the old name. DESIGN.md flags the
/// rename hazard and the typed-reference alternative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(Cow<'static, str>);

impl RoleName {
    /// The administrator role name; every gate's superuser bypass keys on it.
    pub const ADMIN: RoleName = RoleName(Cow::Borrowed("admin"));
    /// The manager role name.
    pub const MANAGER: RoleName = RoleName(Cow::Borrowed("manager"));
    /// The staff role name.
    pub const STAFF: RoleName = RoleName(Cow::Borrowed("staff"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RoleName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A role record: unique name, catalog rank, and a set of permission grants.
///
/// `level` (1–10) is the catalog's own rank. It is **independent of and
/// structurally unrelated to** the fixed three-tier weights the hierarchy gate
/// evaluates; the two rankings coexist unreconciled, and merging them would
/// change observable decisions (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    /// Unique name; matched against `UserAccount.role` by string comparison.
    pub name: RoleName,
    /// Catalog rank, 1–10.
    pub level: u8,
    /// Unordered set of permission grants.
    pub permissions: HashSet<PermissionId>,
    pub is_default: bool,
    pub is_active: bool,
    /// Display hint for the UI; never consulted by the decision core.
    pub color: Option<String>,
    /// Best-effort count of active accounts holding this role name.
    /// Recomputed whenever the record is saved; never a source of truth for
    /// authorization.
    pub user_count: u64,
}

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>, level: u8) -> DomainResult<Self> {
        let name = RoleName::new(name);

        if name.as_str().trim().is_empty() {
            return Err(DomainError::validation("role name cannot be empty"));
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(DomainError::validation(format!(
                "role level must be within {MIN_LEVEL}..={MAX_LEVEL} (got {level})"
            )));
        }

        Ok(Self {
            id: RoleId::new(),
            name,
            level,
            permissions: HashSet::new(),
            is_default: false,
            is_active: true,
            color: None,
            user_count: 0,
        })
    }

    /// Add a permission grant. Granting twice is a no-op (set semantics).
    pub fn grant(&mut self, permission: PermissionId) {
        self.permissions.insert(permission);
    }

    /// Remove a permission grant, if present.
    pub fn revoke(&mut self, permission: &PermissionId) {
        self.permissions.remove(permission);
    }

    pub fn grants(&self, permission: &PermissionId) -> bool {
        self.permissions.contains(permission)
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The built-in role set, granted slices of the seed permission matrix.
///
/// - `staff` (default, rank 1): read/view grants only.
/// - `manager` (rank 5): everything except the settings category.
/// - `admin` (rank 10): every seed grant. Admin accounts never rely on these
///   grants (the gates bypass the matrix for administrators); the record
///   exists so catalog browsing shows the full picture.
pub fn builtin_roles(seed: &[Permission]) -> Vec<Role> {
    let mut staff = Role {
        id: RoleId::new(),
        name: RoleName::STAFF,
        level: 1,
        permissions: HashSet::new(),
        is_default: true,
        is_active: true,
        color: Some("#6c757d".to_string()),
        user_count: 0,
    };
    let mut manager = Role {
        id: RoleId::new(),
        name: RoleName::MANAGER,
        level: 5,
        permissions: HashSet::new(),
        is_default: false,
        is_active: true,
        color: Some("#0d6efd".to_string()),
        user_count: 0,
    };
    let mut admin = Role {
        id: RoleId::new(),
        name: RoleName::ADMIN,
        level: 10,
        permissions: HashSet::new(),
        is_default: false,
        is_active: true,
        color: Some("#dc3545".to_string()),
        user_count: 0,
    };

    for permission in seed {
        admin.grant(permission.id);

        if permission.category != PermissionCategory::Settings {
            manager.grant(permission.id);
        }

        if matches!(
            permission.action,
            PermissionAction::Read | PermissionAction::View
        ) {
            staff.grant(permission.id);
        }
    }

    vec![staff, manager, admin]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::system_permissions;

    #[test]
    fn new_validates_level_bounds() {
        assert!(Role::new("cashier", 0).is_err());
        assert!(Role::new("cashier", 11).is_err());
        assert!(Role::new("cashier", 10).is_ok());
    }

    #[test]
    fn new_rejects_blank_name() {
        let err = Role::new("   ", 3).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn grant_and_revoke_are_set_operations() {
        let mut role = Role::new("cashier", 2).unwrap();
        let permission = PermissionId::new();

        role.grant(permission);
        role.grant(permission);
        assert_eq!(role.permissions.len(), 1);
        assert!(role.grants(&permission));

        role.revoke(&permission);
        assert!(!role.grants(&permission));
    }

    #[test]
    fn builtin_staff_holds_only_read_and_view_grants() {
        let seed = system_permissions();
        let roles = builtin_roles(&seed);
        let staff = roles
            .iter()
            .find(|r| r.name == RoleName::STAFF)
            .unwrap();

        for permission in &seed {
            let expected = matches!(
                permission.action,
                PermissionAction::Read | PermissionAction::View
            );
            assert_eq!(staff.grants(&permission.id), expected, "{}", permission.name);
        }
        assert!(staff.is_default);
    }

    #[test]
    fn builtin_admin_holds_every_seed_grant() {
        let seed = system_permissions();
        let roles = builtin_roles(&seed);
        let admin = roles.iter().find(|r| r.name == RoleName::ADMIN).unwrap();

        assert_eq!(admin.permissions.len(), seed.len());
        assert_eq!(admin.level, MAX_LEVEL);
    }
}

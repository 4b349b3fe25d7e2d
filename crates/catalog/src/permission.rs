//! Permission records: the granular resource×action grant matrix.

use serde::{Deserialize, Serialize};

use storekeep_core::{DomainError, DomainResult, Entity, PermissionId};

/// Sensitivity bounds for a permission record.
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

/// Action a permission grants on its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Create,
    Read,
    Update,
    Delete,
    /// Super-action: satisfies any method-derived action on the same resource.
    /// It is scoped to one resource, not a global wildcard.
    Manage,
    View,
    Export,
    Import,
}

impl PermissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::Create => "create",
            PermissionAction::Read => "read",
            PermissionAction::Update => "update",
            PermissionAction::Delete => "delete",
            PermissionAction::Manage => "manage",
            PermissionAction::View => "view",
            PermissionAction::Export => "export",
            PermissionAction::Import => "import",
        }
    }
}

impl core::fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Functional grouping used for catalog browsing; never consulted by gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionCategory {
    Inventory,
    Sales,
    Users,
    Reports,
    Settings,
    System,
}

/// A single grant in the permission matrix.
///
/// # Invariants
/// - `name` is globally unique (enforced by the catalog on insert).
/// - `(resource, action)` pairs need **not** be unique.
/// - `level` stays within [`MIN_LEVEL`]..=[`MAX_LEVEL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    /// Globally unique name, e.g. `"products.update"`.
    pub name: String,
    /// Free-text resource tag, e.g. `"products"`.
    pub resource: String,
    pub action: PermissionAction,
    pub category: PermissionCategory,
    /// Sensitivity, 1 (routine) to 5 (destructive).
    pub level: u8,
    pub is_active: bool,
    /// Seed data shipped with the system; protected from deletion.
    pub is_system: bool,
}

impl Permission {
    pub fn new(
        name: impl Into<String>,
        resource: impl Into<String>,
        action: PermissionAction,
        category: PermissionCategory,
        level: u8,
    ) -> DomainResult<Self> {
        let name = name.into();
        let resource = resource.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("permission name cannot be empty"));
        }
        if resource.trim().is_empty() {
            return Err(DomainError::validation("permission resource cannot be empty"));
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(DomainError::validation(format!(
                "permission level must be within {MIN_LEVEL}..={MAX_LEVEL} (got {level})"
            )));
        }

        Ok(Self {
            id: PermissionId::new(),
            name,
            resource,
            action,
            category,
            level,
            is_active: true,
            is_system: false,
        })
    }

    // Seed constructor: names/levels are compiled in and stay within bounds.
    fn system(
        name: &str,
        resource: &str,
        action: PermissionAction,
        category: PermissionCategory,
        level: u8,
    ) -> Self {
        Self {
            id: PermissionId::new(),
            name: name.to_string(),
            resource: resource.to_string(),
            action,
            category,
            level,
            is_active: true,
            is_system: true,
        }
    }

    /// Whether this record grants `action` on `resource` right now.
    ///
    /// Inactive records grant nothing; deactivation flips decisions without
    /// any other change to the record.
    pub fn grants(&self, resource: &str, action: PermissionAction) -> bool {
        self.is_active && self.resource == resource && self.action == action
    }

    /// Whether this record is a `manage` super-action for `resource`.
    pub fn grants_manage(&self, resource: &str) -> bool {
        self.is_active && self.resource == resource && self.action == PermissionAction::Manage
    }
}

impl Entity for Permission {
    type Id = PermissionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The seed permission set shipped with every installation.
///
/// All records carry `is_system = true` and are protected from deletion.
pub fn system_permissions() -> Vec<Permission> {
    use PermissionAction::*;
    use PermissionCategory::*;

    vec![
        Permission::system("inventory.view", "inventory", View, Inventory, 1),
        Permission::system("inventory.export", "inventory", Export, Inventory, 2),
        Permission::system("inventory.import", "inventory", Import, Inventory, 3),
        Permission::system("products.read", "products", Read, Inventory, 1),
        Permission::system("products.create", "products", Create, Inventory, 2),
        Permission::system("products.update", "products", Update, Inventory, 2),
        Permission::system("products.delete", "products", Delete, Inventory, 4),
        Permission::system("sales.read", "sales", Read, Sales, 1),
        Permission::system("sales.create", "sales", Create, Sales, 2),
        Permission::system("sales.manage", "sales", Manage, Sales, 3),
        Permission::system("users.read", "users", Read, Users, 2),
        Permission::system("users.update", "users", Update, Users, 4),
        Permission::system("reports.view", "reports", View, Reports, 2),
        Permission::system("reports.export", "reports", Export, Reports, 3),
        Permission::system("settings.update", "settings", Update, Settings, 5),
    ]
}

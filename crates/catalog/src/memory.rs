//! In-memory catalog backing tests, benches and single-process deployments.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use storekeep_core::{DomainError, PermissionId, RoleId, UserId};

use crate::catalog::{
    CatalogError, CatalogResult, PermissionCatalog, RoleCatalog, UserDirectory, is_active_admin,
};
use crate::permission::{Permission, system_permissions};
use crate::role::{Role, builtin_roles};
use crate::user::UserAccount;

#[derive(Debug, Default)]
struct CatalogState {
    permissions: HashMap<PermissionId, Permission>,
    roles: HashMap<RoleId, Role>,
    users: HashMap<UserId, UserAccount>,
}

/// One shared in-memory catalog implementing all three collaborator traits.
///
/// Individual reads/writes are synchronized through a single `RwLock`; this
/// does **not** serialize multi-step sequences such as the admin-count check
/// followed by a deletion (see DESIGN.md).
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-populated with the seed permission matrix and the built-in
    /// staff/manager/admin roles.
    pub fn seeded() -> Self {
        let catalog = Self::new();
        {
            let mut state = catalog
                .inner
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            let seed = system_permissions();
            for role in builtin_roles(&seed) {
                state.roles.insert(role.id, role);
            }
            for permission in seed {
                state.permissions.insert(permission.id, permission);
            }
        }
        catalog
    }

    fn read_state(&self) -> CatalogResult<RwLockReadGuard<'_, CatalogState>> {
        self.inner
            .read()
            .map_err(|_| CatalogError::storage("catalog lock poisoned"))
    }

    fn write_state(&self) -> CatalogResult<RwLockWriteGuard<'_, CatalogState>> {
        self.inner
            .write()
            .map_err(|_| CatalogError::storage("catalog lock poisoned"))
    }

    /// Insert a permission record, enforcing global name uniqueness.
    pub fn insert_permission(&self, permission: Permission) -> CatalogResult<Permission> {
        let mut state = self.write_state()?;

        let duplicate = state
            .permissions
            .values()
            .any(|p| p.name == permission.name && p.id != permission.id);
        if duplicate {
            return Err(DomainError::conflict(format!(
                "permission name '{}' already exists",
                permission.name
            ))
            .into());
        }

        state.permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    /// Remove a permission record. System seed records cannot be deleted.
    pub fn remove_permission(&self, id: &PermissionId) -> CatalogResult<()> {
        let mut state = self.write_state()?;

        let Some(permission) = state.permissions.get(id) else {
            return Err(DomainError::not_found().into());
        };
        if permission.is_system {
            return Err(DomainError::invariant("system permissions cannot be deleted").into());
        }

        state.permissions.remove(id);
        Ok(())
    }

    /// Insert or replace a user account.
    pub fn insert_user(&self, account: UserAccount) -> CatalogResult<UserAccount> {
        let mut state = self.write_state()?;
        state.users.insert(account.id, account.clone());
        Ok(account)
    }

    /// Remove a user account. The caller is expected to have passed the
    /// deletion gates first; the catalog itself does not re-check them.
    pub fn remove_user(&self, id: &UserId) -> CatalogResult<()> {
        let mut state = self.write_state()?;
        if state.users.remove(id).is_none() {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }
}

impl PermissionCatalog for InMemoryCatalog {
    fn find_by_id(&self, id: &PermissionId) -> CatalogResult<Option<Permission>> {
        Ok(self.read_state()?.permissions.get(id).cloned())
    }

    fn find_by_name(&self, name: &str) -> CatalogResult<Option<Permission>> {
        Ok(self
            .read_state()?
            .permissions
            .values()
            .find(|p| p.name == name)
            .cloned())
    }
}

impl RoleCatalog for InMemoryCatalog {
    fn find_by_id(&self, id: &RoleId) -> CatalogResult<Option<Role>> {
        Ok(self.read_state()?.roles.get(id).cloned())
    }

    fn find_by_name(&self, name: &str) -> CatalogResult<Option<Role>> {
        Ok(self
            .read_state()?
            .roles
            .values()
            .find(|r| r.name.as_str() == name)
            .cloned())
    }

    fn permissions_for(&self, role: &Role) -> CatalogResult<Vec<Permission>> {
        let state = self.read_state()?;
        Ok(role
            .permissions
            .iter()
            .filter_map(|id| state.permissions.get(id).cloned())
            .collect())
    }

    fn save(&self, mut role: Role) -> CatalogResult<Role> {
        let mut state = self.write_state()?;

        let duplicate = state
            .roles
            .values()
            .any(|r| r.name == role.name && r.id != role.id);
        if duplicate {
            return Err(DomainError::conflict(format!(
                "role name '{}' already exists",
                role.name
            ))
            .into());
        }

        // Best-effort cache refresh; never consulted for authorization.
        role.user_count = state
            .users
            .values()
            .filter(|u| u.is_active && u.role == role.name)
            .count() as u64;

        state.roles.insert(role.id, role.clone());
        Ok(role)
    }
}

impl UserDirectory for InMemoryCatalog {
    fn find_by_id(&self, id: &UserId) -> CatalogResult<Option<UserAccount>> {
        Ok(self.read_state()?.users.get(id).cloned())
    }

    fn count_active_admins(&self) -> CatalogResult<usize> {
        Ok(self
            .read_state()?
            .users
            .values()
            .filter(|u| is_active_admin(u))
            .count())
    }
}

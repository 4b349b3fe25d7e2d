//! User account records (principal storage).
//!
//! The decision core reads only `role`, `is_active` and `store` from an
//! account; the remaining fields are profile data for the back office UI.

use serde::{Deserialize, Serialize};

use storekeep_core::{DomainError, DomainResult, Entity, StoreId, UserId};

use crate::role::RoleName;

/// A back-office user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    /// Role carried as a **name string** matched against `Role.name`.
    /// A role rename silently orphans accounts still carrying the old name.
    pub role: RoleName,
    pub is_active: bool,
    /// Store this account is partitioned to; `None` for unscoped accounts.
    pub store: Option<StoreId>,
}

impl UserAccount {
    pub fn new(
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: RoleName,
    ) -> DomainResult<Self> {
        let email = email.into();
        let display_name = display_name.into();

        // Basic shape check; full address validation belongs to the mail collaborator.
        if email.trim().is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        if display_name.trim().is_empty() {
            return Err(DomainError::validation("display name cannot be empty"));
        }

        Ok(Self {
            id: UserId::new(),
            email: email.trim().to_lowercase(),
            display_name: display_name.trim().to_string(),
            role,
            is_active: true,
            store: None,
        })
    }

    /// Assign the account to a store partition.
    pub fn with_store(mut self, store: StoreId) -> Self {
        self.store = Some(store);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == RoleName::ADMIN
    }
}

impl Entity for UserAccount {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

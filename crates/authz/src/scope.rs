//! Store-scope gate: data partitioning by assigned store.

use storekeep_core::StoreId;

use crate::error::AuthzError;
use crate::principal::Principal;

/// Restricts managers and staff to their assigned store; administrators are
/// unscoped. Orthogonal to the role gates and composed with them.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreScopeGate;

impl StoreScopeGate {
    /// An absent `target_store` means the operation is not store-scoped and
    /// passes for any active principal. Deliberate allow-on-absence, flagged
    /// as an open question in DESIGN.md rather than hardened into
    /// deny-by-default.
    pub fn allow(
        &self,
        principal: &Principal,
        target_store: Option<&StoreId>,
    ) -> Result<(), AuthzError> {
        principal.ensure_active()?;
        if principal.is_superuser() {
            return Ok(());
        }

        let Some(target) = target_store else {
            return Ok(());
        };

        match principal.store {
            Some(assigned) if assigned == *target => Ok(()),
            _ => Err(AuthzError::ScopeViolation {
                requested: *target,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use storekeep_catalog::RoleName;
    use storekeep_core::UserId;

    #[test]
    fn manager_is_held_to_their_assigned_store() {
        let gate = StoreScopeGate;
        let s1 = StoreId::new();
        let s2 = StoreId::new();
        let manager = Principal::new(UserId::new(), RoleName::MANAGER).with_store(s1);

        assert!(gate.allow(&manager, Some(&s1)).is_ok());
        assert!(matches!(
            gate.allow(&manager, Some(&s2)),
            Err(AuthzError::ScopeViolation { requested }) if requested == s2
        ));
    }

    #[test]
    fn unassigned_principal_is_denied_against_any_store() {
        let gate = StoreScopeGate;
        let staff = Principal::new(UserId::new(), RoleName::STAFF);

        assert!(gate.allow(&staff, Some(&StoreId::new())).is_err());
    }

    #[test]
    fn absent_target_store_allows_any_active_principal() {
        let gate = StoreScopeGate;
        let staff = Principal::new(UserId::new(), RoleName::STAFF);
        let manager = Principal::new(UserId::new(), RoleName::MANAGER).with_store(StoreId::new());

        assert!(gate.allow(&staff, None).is_ok());
        assert!(gate.allow(&manager, None).is_ok());
    }

    #[test]
    fn admin_is_unscoped() {
        let gate = StoreScopeGate;
        let admin = Principal::new(UserId::new(), RoleName::ADMIN).with_store(StoreId::new());

        assert!(gate.allow(&admin, Some(&StoreId::new())).is_ok());
    }

    #[test]
    fn inactive_principal_is_denied_even_without_a_target() {
        let gate = StoreScopeGate;
        let mut p = Principal::new(UserId::new(), RoleName::ADMIN);
        p.is_active = false;

        assert!(matches!(
            gate.allow(&p, None),
            Err(AuthzError::AccountDisabled)
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: active administrators are allowed against any store.
            #[test]
            fn active_admin_always_allowed(with_target in proptest::bool::ANY) {
                let gate = StoreScopeGate;
                let admin = Principal::new(UserId::new(), RoleName::ADMIN);
                let target = StoreId::new();
                let target = with_target.then_some(&target);

                prop_assert!(gate.allow(&admin, target).is_ok());
            }
        }
    }
}

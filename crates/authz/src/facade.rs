//! Per-operation gate pipelines.
//!
//! Route handlers do not pick gates ad hoc: each protected operation class
//! maps to one statically declared pipeline here. The first gate to deny
//! short-circuits the pipeline; granted decisions are reported to the audit
//! sink. There is no retry and no fallback to a different rule set.

use std::sync::Arc;

use chrono::Utc;

use storekeep_catalog::{PermissionAction, RoleCatalog, RoleName, UserDirectory};
use storekeep_core::UserId;

use crate::audit::{AuditSink, DecisionRecord, OperationClass};
use crate::error::{AuthzError, CredentialFault};
use crate::hierarchy::RoleHierarchyGate;
use crate::permissions::{GranularPermissionGate, ResourceMethodGate};
use crate::principal::{Principal, RequestContext};
use crate::safeguards::{BulkOperationGate, DeletionInvariantGate};
use crate::scope::StoreScopeGate;

/// Composes the gates into fixed pipelines, one per protected operation class.
///
/// Every pipeline opens with the store-scope gate: operations that do not name
/// a store pass it trivially, so composing it unconditionally is equivalent to
/// attaching it only to store-scoped routes.
pub struct AuthorizationFacade {
    roles: Arc<dyn RoleCatalog>,
    users: Arc<dyn UserDirectory>,
    audit: Arc<dyn AuditSink>,
}

impl AuthorizationFacade {
    pub fn new(
        roles: Arc<dyn RoleCatalog>,
        users: Arc<dyn UserDirectory>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            roles,
            users,
            audit,
        }
    }

    /// Read lists/records: hierarchy(staff), with the granular matrix as the
    /// alternate path for roles outside the fixed hierarchy.
    pub fn authorize_read(
        &self,
        principal: Option<&Principal>,
        resource: &str,
        request: &RequestContext,
    ) -> Result<(), AuthzError> {
        let principal = require_principal(principal)?;
        StoreScopeGate.allow(principal, request.target_store.as_ref())?;

        // On a hierarchy denial the granular matrix is the alternate route;
        // a double denial surfaces the more specific granular kind, and
        // lookup faults propagate as themselves.
        let decision = RoleHierarchyGate
            .allow(principal, &RoleName::STAFF, request.target_user.as_ref())
            .or_else(|_| {
                GranularPermissionGate::new(self.roles.as_ref()).allow(
                    principal,
                    resource,
                    PermissionAction::Read,
                )
            });

        self.report(decision, OperationClass::ReadRecords, principal)
    }

    /// Create/update records: hierarchy(manager).
    pub fn authorize_mutation(
        &self,
        principal: Option<&Principal>,
        request: &RequestContext,
    ) -> Result<(), AuthzError> {
        let principal = require_principal(principal)?;
        StoreScopeGate.allow(principal, request.target_store.as_ref())?;

        let decision =
            RoleHierarchyGate.allow(principal, &RoleName::MANAGER, request.target_user.as_ref());
        self.report(decision, OperationClass::MutateRecords, principal)
    }

    /// Delete records: hierarchy(admin).
    pub fn authorize_deletion(
        &self,
        principal: Option<&Principal>,
        request: &RequestContext,
    ) -> Result<(), AuthzError> {
        let principal = require_principal(principal)?;
        StoreScopeGate.allow(principal, request.target_store.as_ref())?;

        let decision =
            RoleHierarchyGate.allow(principal, &RoleName::ADMIN, request.target_user.as_ref());
        self.report(decision, OperationClass::DeleteRecords, principal)
    }

    /// User-account deletion: the deletion invariant gate specifically.
    pub fn authorize_user_deletion(
        &self,
        principal: Option<&Principal>,
        target_user: &UserId,
    ) -> Result<(), AuthzError> {
        let principal = require_principal(principal)?;

        let decision = DeletionInvariantGate::new(self.users.as_ref()).allow(principal, target_user);
        self.report(decision, OperationClass::UserDeletion, principal)
    }

    /// Statistics/reporting: hierarchy(manager).
    pub fn authorize_statistics(
        &self,
        principal: Option<&Principal>,
        request: &RequestContext,
    ) -> Result<(), AuthzError> {
        let principal = require_principal(principal)?;
        StoreScopeGate.allow(principal, request.target_store.as_ref())?;

        let decision =
            RoleHierarchyGate.allow(principal, &RoleName::MANAGER, request.target_user.as_ref());
        self.report(decision, OperationClass::Statistics, principal)
    }

    /// Bulk mutation: the coarse role-pinned gate.
    pub fn authorize_bulk(
        &self,
        principal: Option<&Principal>,
        request: &RequestContext,
    ) -> Result<(), AuthzError> {
        let principal = require_principal(principal)?;
        StoreScopeGate.allow(principal, request.target_store.as_ref())?;

        let decision = BulkOperationGate.allow(principal);
        self.report(decision, OperationClass::BulkMutation, principal)
    }

    /// Generic resource route guard: verb-derived action with `manage` as the
    /// per-resource super-action.
    pub fn authorize_request(
        &self,
        principal: Option<&Principal>,
        resource: &str,
        method: &str,
        request: &RequestContext,
    ) -> Result<(), AuthzError> {
        let principal = require_principal(principal)?;
        StoreScopeGate.allow(principal, request.target_store.as_ref())?;

        let decision =
            ResourceMethodGate::new(self.roles.as_ref()).allow(principal, resource, method);
        self.report(decision, OperationClass::ResourceRequest, principal)
    }

    // Report granted decisions to the audit sink; denials pass through
    // unreported (failure-side handling belongs to the caller).
    fn report(
        &self,
        decision: Result<(), AuthzError>,
        operation: OperationClass,
        principal: &Principal,
    ) -> Result<(), AuthzError> {
        if decision.is_ok() {
            self.audit.record(DecisionRecord {
                operation,
                principal: principal.id,
                role: principal.role.clone(),
                occurred_at: Utc::now(),
            });
        }
        decision
    }
}

/// An absent principal is the distinct "no credentials" fault, surfaced
/// before any gate runs.
fn require_principal(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
    principal.ok_or(AuthzError::Unauthenticated(CredentialFault::Missing))
}

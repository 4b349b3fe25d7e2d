//! `storekeep-authz` — the authorization decision core (zero-trust boundary).
//!
//! Six gates over three mechanisms: a fixed three-tier role hierarchy, the
//! granular resource×action permission matrix, and store-scoped partitioning,
//! plus the hand-coded bulk and last-administrator safeguards. The facade
//! composes them into one fixed pipeline per protected operation.
//!
//! This crate is intentionally decoupled from HTTP and storage: principals
//! arrive validated from the authentication collaborator, and catalog state is
//! read through the `storekeep-catalog` traits on every decision.

pub mod audit;
pub mod claims;
pub mod error;
pub mod explain;
pub mod facade;
pub mod hierarchy;
pub mod permissions;
pub mod principal;
pub mod safeguards;
pub mod scope;

pub use audit::{AuditSink, DecisionRecord, InMemoryAuditSink, OperationClass, TracingAuditSink};
pub use claims::{Authenticator, SessionClaims, validate_claims};
pub use error::{AuthzError, CredentialFault};
pub use explain::{DecisionExplanation, DenialKind, explain_permission};
pub use facade::AuthorizationFacade;
pub use hierarchy::{RoleHierarchyGate, hierarchy_weight};
pub use permissions::{GranularPermissionGate, ResourceMethodGate, action_for_method};
pub use principal::{Principal, RequestContext};
pub use safeguards::{BulkOperationGate, DeletionInvariantGate};
pub use scope::StoreScopeGate;

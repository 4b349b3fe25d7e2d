//! Decision error taxonomy.
//!
//! Every gate decision is local and terminal: a denial surfaces immediately
//! with its specific kind, never collapsed into a generic "forbidden", and no
//! gate retries or falls back to a different rule set.

use thiserror::Error;

use storekeep_catalog::{CatalogError, PermissionAction, RoleName};
use storekeep_core::StoreId;

/// Credential fault reported by the authentication collaborator.
///
/// The three kinds stay distinct all the way to client messaging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialFault {
    #[error("no credentials presented")]
    Missing,

    #[error("credentials expired")]
    Expired,

    #[error("malformed credentials: {0}")]
    Malformed(String),
}

/// Outcome of a denied (or failed) authorization decision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The caller never became a principal.
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] CredentialFault),

    /// The account exists but is disabled.
    #[error("account is disabled")]
    AccountDisabled,

    /// The hierarchy check failed; carries required vs actual role names.
    #[error("insufficient role: required '{required}', actual '{actual}'")]
    InsufficientRole {
        required: RoleName,
        actual: RoleName,
    },

    /// The granular matrix holds no matching active grant.
    #[error("permission denied: missing '{resource}:{action}'")]
    PermissionDenied {
        resource: String,
        action: PermissionAction,
    },

    /// Unmapped HTTP-style verb. A client error, not a permission decision.
    #[error("invalid method '{0}'")]
    InvalidMethod(String),

    /// The request names a store outside the caller's assignment.
    #[error("store scope violation: store '{requested}' is outside the caller's assignment")]
    ScopeViolation { requested: StoreId },

    /// Deleting the target would remove the last active administrator.
    #[error("cannot remove the last active administrator")]
    LastAdminProtected,

    /// A catalog read failed. Not attributable to the caller; the decision
    /// fails closed while surfacing this distinct kind.
    #[error("authorization lookup failed: {0}")]
    InternalLookupFailure(#[from] CatalogError),
}

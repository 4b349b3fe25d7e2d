//! Session claims model (transport-agnostic).
//!
//! This is the minimal set of claims the back office expects once a token has
//! been decoded and signature-verified by the authentication collaborator.
//! Token issuance and cryptography are intentionally outside this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storekeep_catalog::RoleName;
use storekeep_core::{StoreId, UserId};

use crate::error::CredentialFault;
use crate::principal::Principal;

/// Claims carried by a validated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / account identifier.
    pub sub: UserId,

    /// Role name granted to the session.
    pub role: RoleName,

    /// Whether the account was active at issuance.
    pub is_active: bool,

    /// Store assignment at issuance, if any.
    pub store: Option<StoreId>,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// Snapshot the claims into a principal for the gates.
    pub fn into_principal(self) -> Principal {
        Principal {
            id: self.sub,
            role: self.role,
            is_active: self.is_active,
            store: self.store,
        }
    }
}

/// Deterministically validate session claims.
///
/// Time-window defects (expiry preceding issuance, issuance in the future)
/// are malformed credentials; a past expiry is the distinct `Expired` fault.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), CredentialFault> {
    if claims.expires_at <= claims.issued_at {
        return Err(CredentialFault::Malformed(
            "expiry precedes issuance".to_string(),
        ));
    }
    if now < claims.issued_at {
        return Err(CredentialFault::Malformed(
            "issued in the future".to_string(),
        ));
    }
    if now >= claims.expires_at {
        return Err(CredentialFault::Expired);
    }
    Ok(())
}

/// Authentication collaborator contract.
///
/// Implementations decode and verify presented credentials and hand the core
/// a validated principal. `None` credentials map to the `Missing` fault; the
/// core never inspects tokens itself.
pub trait Authenticator: Send + Sync {
    fn authenticate(
        &self,
        credentials: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Principal, CredentialFault>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> SessionClaims {
        SessionClaims {
            sub: UserId::new(),
            role: RoleName::STAFF,
            is_active: true,
            store: None,
            issued_at,
            expires_at,
        }
    }

    #[test]
    fn valid_window_passes() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(5), now + Duration::minutes(5));
        assert!(validate_claims(&c, now).is_ok());
    }

    #[test]
    fn expired_claims_report_expired() {
        let now = Utc::now();
        let c = claims(now - Duration::hours(2), now - Duration::hours(1));
        assert_eq!(validate_claims(&c, now), Err(CredentialFault::Expired));
    }

    #[test]
    fn future_issuance_is_malformed() {
        let now = Utc::now();
        let c = claims(now + Duration::minutes(1), now + Duration::hours(1));
        assert!(matches!(
            validate_claims(&c, now),
            Err(CredentialFault::Malformed(_))
        ));
    }

    #[test]
    fn inverted_window_is_malformed() {
        let now = Utc::now();
        let c = claims(now, now - Duration::seconds(1));
        assert!(matches!(
            validate_claims(&c, now),
            Err(CredentialFault::Malformed(_))
        ));
    }

    /// Table-backed authenticator: the shape a session-store collaborator
    /// takes when it fronts the gates.
    struct TableAuthenticator {
        sessions: std::collections::HashMap<String, SessionClaims>,
    }

    impl Authenticator for TableAuthenticator {
        fn authenticate(
            &self,
            credentials: Option<&str>,
            now: DateTime<Utc>,
        ) -> Result<Principal, CredentialFault> {
            let token = credentials.ok_or(CredentialFault::Missing)?;
            let claims = self
                .sessions
                .get(token)
                .ok_or_else(|| CredentialFault::Malformed("unknown session".to_string()))?;
            validate_claims(claims, now)?;
            Ok(claims.clone().into_principal())
        }
    }

    #[test]
    fn authenticator_distinguishes_the_three_faults() {
        let now = Utc::now();
        let live = claims(now - Duration::minutes(5), now + Duration::minutes(5));
        let stale = claims(now - Duration::hours(2), now - Duration::hours(1));

        let auth = TableAuthenticator {
            sessions: [("live".to_string(), live), ("stale".to_string(), stale)]
                .into_iter()
                .collect(),
        };

        assert_eq!(
            auth.authenticate(None, now).unwrap_err(),
            CredentialFault::Missing
        );
        assert!(matches!(
            auth.authenticate(Some("garbled"), now).unwrap_err(),
            CredentialFault::Malformed(_)
        ));
        assert_eq!(
            auth.authenticate(Some("stale"), now).unwrap_err(),
            CredentialFault::Expired
        );
        assert!(auth.authenticate(Some("live"), now).is_ok());
    }

    #[test]
    fn into_principal_preserves_decision_fields() {
        let store = StoreId::new();
        let now = Utc::now();
        let mut c = claims(now - Duration::minutes(1), now + Duration::minutes(1));
        c.store = Some(store);
        c.is_active = false;

        let principal = c.clone().into_principal();
        assert_eq!(principal.id, c.sub);
        assert_eq!(principal.store, Some(store));
        assert!(!principal.is_active);
    }
}

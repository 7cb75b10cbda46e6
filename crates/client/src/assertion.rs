//! Identity assertion signing.
//!
//! Mints the short-lived HS256 JWT a Connected App presents at sign-in.
//! Every call produces a fresh assertion: `jti` is a new v4 UUID and
//! `exp` is pinned to `iat + 5` minutes, so a captured token is useless
//! almost immediately and replay is rejected by the platform.
//!
//! The platform requires the client id (`iss`) alongside the key id
//! (`kid`) inside the token *header*; `jsonwebtoken`'s `Header` type has
//! no `iss` field, so the header is serialized by hand and signed with
//! [`jsonwebtoken::crypto::sign`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tc_domain::config::ApplicationIdentity;
use tc_domain::error::{Error, Result};

/// Fixed audience for Connected-App assertions.
pub const AUDIENCE: &str = "tableau";

/// Assertion lifetime. The platform caps Connected-App JWTs at 10
/// minutes; 5 keeps a comfortable clock-skew margin.
const LIFETIME_MINUTES: i64 = 5;

/// JOSE header carrying both the verification key id and the client id.
#[derive(Debug, Serialize)]
struct AssertionHeader<'a> {
    alg: &'a str,
    typ: &'a str,
    kid: &'a str,
    iss: &'a str,
}

/// Claim set of one assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub scp: Vec<String>,
}

/// Build and sign an identity assertion for `identity` at time `now`.
///
/// The output is intentionally non-deterministic: a fresh `jti` every
/// call. Returns the serialized compact JWT (`header.claims.signature`).
///
/// # Errors
///
/// Returns [`Error::Signing`] if HMAC computation fails. Field validity
/// is not checked here; configuration loading already rejected empty
/// identity fields.
pub fn sign(identity: &ApplicationIdentity, now: DateTime<Utc>) -> Result<String> {
    let header = AssertionHeader {
        alg: "HS256",
        typ: "JWT",
        kid: &identity.secret_key_id,
        iss: &identity.client_id,
    };
    let claims = AssertionClaims {
        iss: identity.client_id.clone(),
        sub: identity.subject_user.clone(),
        aud: AUDIENCE.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(LIFETIME_MINUTES)).timestamp(),
        jti: Uuid::new_v4().to_string(),
        scp: identity.scopes.clone(),
    };

    let encoded_header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
    let encoded_claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
    let message = format!("{encoded_header}.{encoded_claims}");

    let signature = jsonwebtoken::crypto::sign(
        message.as_bytes(),
        &EncodingKey::from_secret(identity.shared_secret.as_bytes()),
        Algorithm::HS256,
    )
    .map_err(|e| Error::Signing(e.to_string()))?;

    Ok(format!("{message}.{signature}"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};

    const SECRET: &str = "unit-test-shared-secret";

    fn identity() -> ApplicationIdentity {
        ApplicationIdentity {
            client_id: "client-abc".into(),
            shared_secret: SECRET.into(),
            secret_key_id: "secret-id-1".into(),
            subject_user: "svc-account@example.com".into(),
            scopes: vec![
                "tableau:views:embed".into(),
                "tableau:content:read".into(),
            ],
        }
    }

    fn validation() -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.set_audience(&[AUDIENCE]);
        v
    }

    fn decode_claims(token: &str, secret: &str) -> jsonwebtoken::errors::Result<AssertionClaims> {
        decode::<AssertionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation(),
        )
        .map(|data| data.claims)
    }

    #[test]
    fn verifier_with_correct_secret_accepts_fresh_assertion() {
        let token = sign(&identity(), Utc::now()).unwrap();
        let claims = decode_claims(&token, SECRET).unwrap();
        assert_eq!(claims.iss, "client-abc");
        assert_eq!(claims.sub, "svc-account@example.com");
        assert_eq!(claims.aud, AUDIENCE);
        assert_eq!(
            claims.scp,
            vec!["tableau:views:embed", "tableau:content:read"]
        );
    }

    #[test]
    fn verifier_with_wrong_secret_rejects() {
        let token = sign(&identity(), Utc::now()).unwrap();
        let err = decode_claims(&token, "some-other-secret").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn expired_assertion_is_rejected() {
        // Signed 10 minutes in the past: expired 5 minutes ago, well
        // beyond the verifier's default leeway.
        let past = Utc::now() - Duration::minutes(10);
        let token = sign(&identity(), past).unwrap();
        let err = decode_claims(&token, SECRET).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn expiry_is_exactly_five_minutes_after_issue() {
        let now = Utc::now();
        let token = sign(&identity(), now).unwrap();
        let claims = decode_claims(&token, SECRET).unwrap();
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, claims.iat + 300);
    }

    #[test]
    fn successive_assertions_differ_only_in_jti() {
        let now = Utc::now();
        let a = decode_claims(&sign(&identity(), now).unwrap(), SECRET).unwrap();
        let b = decode_claims(&sign(&identity(), now).unwrap(), SECRET).unwrap();
        assert_eq!(a.iss, b.iss);
        assert_eq!(a.sub, b.sub);
        assert_eq!(a.aud, b.aud);
        assert_eq!(a.scp, b.scp);
        assert!(b.iat >= a.iat);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn header_carries_kid_and_client_id() {
        let token = sign(&identity(), Utc::now()).unwrap();
        let raw_header = token.split('.').next().unwrap();
        let bytes = URL_SAFE_NO_PAD.decode(raw_header).unwrap();
        let header: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(header["alg"], "HS256");
        assert_eq!(header["typ"], "JWT");
        assert_eq!(header["kid"], "secret-id-1");
        assert_eq!(header["iss"], "client-abc");
    }

    #[test]
    fn jti_is_a_v4_uuid() {
        let token = sign(&identity(), Utc::now()).unwrap();
        let claims = decode_claims(&token, SECRET).unwrap();
        let parsed = Uuid::parse_str(&claims.jti).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }
}

//! End-to-end check of the credential issuance side: configuration
//! loading feeds the signer, and the signed assertion verifies against
//! the configured shared secret.

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use tc_client::sign;
use tc_domain::config::Config;

#[derive(Deserialize)]
struct Claims {
    iss: String,
    sub: String,
    aud: String,
    iat: i64,
    exp: i64,
    jti: String,
    scp: Vec<String>,
}

fn config() -> Config {
    let env = [
        ("CONNECTED_APP_CLIENT_ID", "client-abc"),
        ("CONNECTED_APP_SECRET", "integration-secret"),
        ("CONNECTED_APP_SECRET_ID", "secret-id-1"),
        ("TABLEAU_USER", "svc-account@example.com"),
        ("TABLEAU_POD", "10ax.online.tableau.com"),
        ("TABLEAU_API_VERSION", "3.22"),
        ("TABLEAU_SITE", "acme"),
        ("TABLEAU_PROJECTS", "Sales,HR"),
    ];
    Config::from_lookup(|name| {
        env.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    })
    .unwrap()
}

#[test]
fn configured_identity_produces_verifiable_assertion() {
    let config = config();
    let now = Utc::now();
    let token = sign(&config.identity, now).unwrap();

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&["tableau"]);
    let claims = decode::<Claims>(
        &token,
        &DecodingKey::from_secret("integration-secret".as_bytes()),
        &validation,
    )
    .unwrap()
    .claims;

    assert_eq!(claims.iss, "client-abc");
    assert_eq!(claims.sub, "svc-account@example.com");
    assert_eq!(claims.aud, "tableau");
    assert_eq!(claims.iat, now.timestamp());
    assert_eq!(claims.exp, now.timestamp() + 300);
    assert!(!claims.jti.is_empty());
    assert_eq!(
        claims.scp,
        vec![
            "tableau:views:embed",
            "tableau:insights:embed",
            "tableau:content:read"
        ]
    );
}

#[test]
fn assertions_for_one_identity_never_share_a_jti() {
    let config = config();
    let now = Utc::now();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..16 {
        let token = sign(&config.identity, now).unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["tableau"]);
        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret("integration-secret".as_bytes()),
            &validation,
        )
        .unwrap()
        .claims;
        assert!(seen.insert(claims.jti), "jti reuse across assertions");
    }
}

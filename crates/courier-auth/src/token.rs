use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use courier_types::api::Claims;

/// Mints and checks signed session tokens. The signing secret and the
/// optional time-to-live are injected at construction; with `ttl: None`
/// (the default deployment) tokens never expire and verification skips
/// the `exp` check entirely.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if ttl.is_none() {
            validation.validate_exp = false;
            validation.set_required_spec_claims::<&str>(&[]);
        }
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Sign a token binding `username` and the issuance time. The claims
    /// are readable by anyone holding the token; only the signature
    /// depends on the secret.
    pub fn issue(&self, username: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            iat: now.timestamp() as usize,
            exp: self.ttl.map(|ttl| (now + ttl).timestamp() as usize),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Recover the claims from a token. Fails on a bad signature, a
    /// malformed token, or (when a TTL is configured) an expired one.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_roundtrip() {
        let issuer = TokenIssuer::new("test-secret", None);
        let token = issuer.issue("alice").unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert!(claims.exp.is_none());
        assert!(claims.iat > 0);
    }

    #[test]
    fn wrong_secret_fails() {
        let issuer = TokenIssuer::new("secret-a", None);
        let other = TokenIssuer::new("secret-b", None);

        let token = issuer.issue("alice").unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn corrupted_token_fails() {
        let issuer = TokenIssuer::new("test-secret", None);

        assert!(issuer.verify("garbage").is_err());
        assert!(issuer.verify("a.b.c").is_err());

        let token = issuer.issue("alice").unwrap();
        let mut corrupted = token.clone();
        corrupted.replace_range(..4, "AAAA");
        assert!(issuer.verify(&corrupted).is_err());
    }

    #[test]
    fn expired_token_fails_when_ttl_configured() {
        // A negative TTL mints a token that expired an hour ago, well
        // past the default validation leeway.
        let issuer = TokenIssuer::new("test-secret", Some(Duration::hours(-1)));
        let token = issuer.issue("alice").unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn expiry_is_ignored_without_ttl() {
        let expiring = TokenIssuer::new("test-secret", Some(Duration::hours(-1)));
        let lax = TokenIssuer::new("test-secret", None);

        // Same secret, so the signature checks out; only the exp claim
        // differs in treatment.
        let token = expiring.issue("alice").unwrap();
        assert_eq!(lax.verify(&token).unwrap().username, "alice");
    }
}

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token payload. `sub` carries the user id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Malformed token")]
    Malformed,
    #[error("Invalid token signature")]
    Invalid,
    #[error("Token expired")]
    Expired,
}

/// Issues and verifies self-contained HS256 bearer tokens signed with a
/// single process-wide secret. No per-user nonce, no key rotation, no
/// revocation list: a token dies only by expiring.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Create a token for `user_id`, valid for the configured TTL.
    pub fn issue(&self, user_id: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_owned(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Recompute the signature over the token's first two segments and
    /// check expiry. Purely computational; never touches storage.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock slack: a token is rejected the second it expires.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::Invalid,
                _ => AuthError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test_secret", 3600)
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let tokens = service();
        let token = tokens.issue("user_123").unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "user_123");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wire_format_is_three_dot_joined_segments() {
        let token = service().issue("user_123").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        // base64url, no padding
        for part in parts {
            assert!(!part.contains('='));
            assert!(!part.contains('+'));
            assert!(!part.contains('/'));
        }
    }

    #[test]
    fn test_tampering_any_segment_is_rejected() {
        let tokens = service();
        let token = tokens.issue("user_123").unwrap();
        let segments: Vec<&str> = token.split('.').collect();

        for (i, segment) in segments.iter().enumerate() {
            // Flip the middle character of the segment.
            let mid = segment.len() / 2;
            let original = segment.as_bytes()[mid] as char;
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut tampered_segment = segment.to_string();
            tampered_segment.replace_range(mid..mid + 1, &replacement.to_string());

            let mut parts = segments.clone();
            parts[i] = &tampered_segment;
            let tampered = parts.join(".");

            let err = tokens.verify(&tampered).unwrap_err();
            assert!(
                matches!(err, AuthError::Invalid | AuthError::Malformed),
                "segment {i} tampering yielded {err:?}"
            );
        }
    }

    #[test]
    fn test_wrong_segment_count_is_malformed() {
        let tokens = service();
        assert_eq!(tokens.verify("no-dots-at-all"), Err(AuthError::Malformed));
        assert_eq!(tokens.verify("only.two"), Err(AuthError::Malformed));
        assert_eq!(tokens.verify("a.b.c.d"), Err(AuthError::Malformed));
        assert_eq!(tokens.verify(""), Err(AuthError::Malformed));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = service().issue("user_123").unwrap();
        let other = TokenService::new("other_secret", 3600);
        assert_eq!(other.verify(&token), Err(AuthError::Invalid));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // TTL already in the past: exp = now - 2.
        let tokens = TokenService::new("test_secret", -2);
        let token = tokens.issue("user_123").unwrap();
        assert_eq!(tokens.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_token_within_ttl_is_accepted() {
        // One second shy of expiry still verifies (zero leeway).
        let tokens = TokenService::new("test_secret", 2);
        let token = tokens.issue("user_123").unwrap();
        assert!(tokens.verify(&token).is_ok());
    }
}

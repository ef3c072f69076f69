use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::claims::TokenKind;
use super::errors::TokenError;

/// Signs and verifies kind-tagged bearer tokens.
///
/// Uses HS256 (HMAC with SHA-256). Every token embeds its subject, kind,
/// issued-at, and expiry; verification checks signature, expiry, and that
/// the embedded kind matches the kind the caller expects.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a new codec with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a signed token for a subject.
    ///
    /// # Arguments
    /// * `subject` - Identity the token is issued for
    /// * `kind` - Credential kind to embed
    /// * `ttl` - Validity window from now
    ///
    /// # Returns
    /// Signed token string and its claims (the claims carry the computed
    /// expiry, which callers persist for revocable kinds)
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(
        &self,
        subject: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<(String, TokenClaims), TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let header = Header::new(self.algorithm);
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok((token, claims))
    }

    /// Verify a token and check it was issued for the expected kind.
    ///
    /// # Arguments
    /// * `token` - Token string to verify
    /// * `expected_kind` - Kind the calling operation accepts
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `Expired` - Token validity window has passed
    /// * `Malformed` - Signature is invalid or token is not well-formed
    /// * `WrongKind` - Token was issued for a different kind
    pub fn verify(&self, token: &str, expected_kind: TokenKind) -> Result<TokenClaims, TokenError> {
        let validation = Validation::new(self.algorithm);

        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if claims.kind != expected_kind {
            return Err(TokenError::WrongKind {
                expected: expected_kind,
                actual: claims.kind,
            });
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"test_secret_key_at_least_32_bytes!")
    }

    #[test]
    fn test_issue_and_verify() {
        let codec = codec();

        let (token, issued) = codec
            .issue("user123", TokenKind::Access, Duration::minutes(30))
            .expect("Failed to issue token");
        assert!(!token.is_empty());
        assert_eq!(issued.exp - issued.iat, 30 * 60);

        let claims = codec
            .verify(&token, TokenKind::Access)
            .expect("Failed to verify token");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_verify_wrong_kind() {
        let codec = codec();

        let (token, _) = codec
            .issue("user123", TokenKind::Refresh, Duration::days(30))
            .expect("Failed to issue token");

        let result = codec.verify(&token, TokenKind::Access);
        assert_eq!(
            result,
            Err(TokenError::WrongKind {
                expected: TokenKind::Access,
                actual: TokenKind::Refresh,
            })
        );
    }

    #[test]
    fn test_verify_expired() {
        let codec = codec();

        // Well past the default decoding leeway.
        let (token, _) = codec
            .issue("user123", TokenKind::Access, Duration::minutes(-10))
            .expect("Failed to issue token");

        let result = codec.verify(&token, TokenKind::Access);
        assert_eq!(result, Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_garbage() {
        let codec = codec();

        let result = codec.verify("invalid.token.here", TokenKind::Access);
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let codec1 = TokenCodec::new(b"secret1_at_least_32_bytes_long_key!");
        let codec2 = TokenCodec::new(b"secret2_at_least_32_bytes_long_key!");

        let (token, _) = codec1
            .issue("user123", TokenKind::Access, Duration::minutes(30))
            .expect("Failed to issue token");

        let result = codec2.verify(&token, TokenKind::Access);
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }
}

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Kind of credential a token represents.
///
/// The kind is embedded in the signed payload, so a token issued for one
/// purpose cannot be replayed against an operation expecting another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    /// Short-lived, stateless session token. Never persisted.
    Access,
    /// Long-lived session token, persisted so it can be revoked.
    Refresh,
    /// Single-use password reset token.
    ResetPassword,
    /// Single-use email verification token.
    VerifyEmail,
}

impl TokenKind {
    /// Wire/storage representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::ResetPassword => "resetPassword",
            TokenKind::VerifyEmail => "verifyEmail",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed payload carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user/entity identifier)
    pub sub: String,

    /// Credential kind this token was issued for
    pub kind: TokenKind,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

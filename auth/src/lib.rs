//! Authentication primitives library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id)
//! - Kind-tagged token issuance and verification (JWT)
//!
//! Each service defines its own token lifecycle on top of these primitives.
//! The codec refuses tokens whose embedded kind does not match the kind the
//! caller expects, so a refresh token can never pass as an access token.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Kind-Tagged Tokens
//! ```
//! use auth::{TokenCodec, TokenKind};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let (token, _claims) = codec
//!     .issue("user123", TokenKind::Access, Duration::minutes(30))
//!     .unwrap();
//! let claims = codec.verify(&token, TokenKind::Access).unwrap();
//! assert_eq!(claims.sub, "user123");
//!
//! // The same token is rejected when a different kind is expected.
//! assert!(codec.verify(&token, TokenKind::Refresh).is_err());
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::TokenClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenKind;
pub use password::PasswordError;
pub use password::PasswordHasher;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::auth::models::AuthTokens;
use crate::domain::auth::models::TokenData;

pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod refresh_tokens;
pub mod register;
pub mod reset_password;
pub mod send_verification_email;
pub mod verify_email;

pub use forgot_password::forgot_password;
pub use login::login;
pub use logout::logout;
pub use refresh_tokens::refresh_tokens;
pub use register::register;
pub use reset_password::reset_password;
pub use send_verification_email::send_verification_email;
pub use verify_email::verify_email;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&TokenData> for TokenResponseData {
    fn from(data: &TokenData) -> Self {
        Self {
            token: data.token.clone(),
            expires_at: data.expires_at,
        }
    }
}

/// Access/refresh pair as returned by register, login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthTokensResponseData {
    pub access: TokenResponseData,
    pub refresh: TokenResponseData,
}

impl From<&AuthTokens> for AuthTokensResponseData {
    fn from(tokens: &AuthTokens) -> Self {
        Self {
            access: (&tokens.access).into(),
            refresh: (&tokens.refresh).into(),
        }
    }
}

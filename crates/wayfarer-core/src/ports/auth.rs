//! Identity provider port.

use uuid::Uuid;

use crate::domain::Caller;

/// Claims carried by an access token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl From<TokenClaims> for Caller {
    fn from(claims: TokenClaims) -> Self {
        Caller::new(claims.user_id, claims.is_admin)
    }
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Issue an access token for a user.
    fn generate_token(&self, user_id: Uuid, is_admin: bool) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing access token")]
    MissingAuth,
}

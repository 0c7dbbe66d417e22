//! Authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use wayfarer_core::domain::Caller;
use wayfarer_core::ports::{AuthError, TokenService};
use wayfarer_shared::ErrorResponse;

/// Cookie consulted when no `Authorization` header is present.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub is_admin: bool,
}

impl Identity {
    pub fn caller(&self) -> Caller {
        Caller::new(self.user_id, self.is_admin)
    }
}

impl From<Caller> for Identity {
    fn from(caller: Caller) -> Self {
        Self {
            user_id: caller.user_id,
            is_admin: caller.is_admin,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let message = match &self.0 {
            AuthError::TokenExpired => "Your session has expired. Please sign in again.",
            AuthError::InvalidToken(_) => "Unauthorized",
            AuthError::MissingAuth => "Unauthorized",
        };

        actix_web::HttpResponse::build(self.status_code())
            .json(ErrorResponse::unauthorized(message))
    }
}

/// Pull the raw token from `Authorization: Bearer` or the access token cookie.
fn extract_token(req: &HttpRequest) -> Result<String, AuthError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let auth_str = value
            .to_str()
            .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

        return auth_str
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()));
    }

    req.cookie(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AuthError::MissingAuth)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token_service = match req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() {
            Some(service) => service,
            None => {
                tracing::error!("TokenService not found in app data");
                return ready(Err(AuthenticationError(AuthError::InvalidToken(
                    "Server configuration error".to_string(),
                ))));
            }
        };

        let result = extract_token(req)
            .and_then(|token| token_service.validate_token(&token))
            .map(|claims| Identity::from(Caller::from(claims)))
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected request credentials");
                AuthenticationError(e)
            });

        ready(result)
    }
}

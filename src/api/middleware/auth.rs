use crate::AppState;
use crate::api::error::AppError;
use crate::services::token::AuthError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Gate for protected routes. Verifies the bearer token and injects
/// the claims as a request extension; every failure is a 401 carrying
/// the specific auth error.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    let Some(token) = token else {
        return Err(AuthError::Malformed.into());
    };

    let claims = state.tokens.verify(&token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

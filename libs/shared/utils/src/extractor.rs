use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Validates the bearer token and stores the resulting `User` in request extensions.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    let token = auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))?;

    let user = validate_token(token, &config.supabase_jwt_secret)
        .map_err(|e| AppError::Auth(e.to_string()))?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Fails with `Forbidden` unless the principal carries one of `allowed`.
pub fn require_role(user: &User, allowed: &[Role]) -> Result<Role, AppError> {
    match user.role() {
        Some(role) if allowed.contains(&role) => Ok(role),
        _ => Err(AppError::Forbidden(format!(
            "This operation requires one of the roles: {}",
            allowed
                .iter()
                .map(Role::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

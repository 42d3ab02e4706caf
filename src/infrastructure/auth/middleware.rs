use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::{domain::auth::JwtManager, error::AppError};

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Caller identity injected into request extensions after authentication
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

type HmacSha256 = Hmac<Sha256>;

const ADMIN_DIGEST_KEY: &[u8] = b"bootcaster-admin-token";

/// Shared secret guarding administrative routes, kept only as a MAC digest
pub struct AdminToken {
    digest: Option<Vec<u8>>,
}

impl AdminToken {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let digest = admin_mac().filter(|_| !token.is_empty()).map(|mut mac| {
            mac.update(token.as_bytes());
            mac.finalize().into_bytes().to_vec()
        });
        Self { digest }
    }

    /// Compare digests with the MAC's constant-time check
    fn matches(&self, candidate: &str) -> bool {
        let (Some(expected), Some(mut mac)) = (&self.digest, admin_mac()) else {
            return false;
        };
        mac.update(candidate.as_bytes());
        mac.verify_slice(expected).is_ok()
    }
}

fn admin_mac() -> Option<HmacSha256> {
    HmacSha256::new_from_slice(ADMIN_DIGEST_KEY).ok()
}

/// Bearer authentication middleware
pub async fn auth_middleware(
    State(jwt_manager): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))?;

    let claims = jwt_manager.validate_token(token)?;

    request.extensions_mut().insert(AuthUser {
        uid: claims.sub,
        email: claims.email.trim().to_lowercase(),
    });

    Ok(next.run(request).await)
}

/// Admin authentication middleware
pub async fn admin_middleware(
    State(admin_token): State<Arc<AdminToken>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing admin token".to_string()))?;

    if !admin_token.matches(provided) {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request");
        return Err(AppError::Unauthorized("Invalid admin token".to_string()));
    }

    Ok(next.run(request).await)
}

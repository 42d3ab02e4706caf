use crate::error::{AppError, AppResult};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims of an identity token issued by the sign-in provider
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Provider user id
    #[serde(default)]
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Validates HS256 identity tokens against the shared secret
pub struct JwtManager {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validate a token and extract its claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        if claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized("Token has no subject".to_string()));
        }
        if claims.email.trim().is_empty() {
            return Err(AppError::Unauthorized("Token has no email".to_string()));
        }

        Ok(claims)
    }
}

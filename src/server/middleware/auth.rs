use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::server::error::{auth::AuthError, AppError};

/// Guards producer endpoints with a shared bearer token.
///
/// Producers are other services, not users, so there is no session: each request
/// carries `Authorization: Bearer {RENAME_API_TOKEN}`.
pub struct AuthGuard<'a> {
    token: &'a str,
    headers: &'a HeaderMap,
}

impl<'a> AuthGuard<'a> {
    pub fn new(token: &'a str, headers: &'a HeaderMap) -> Self {
        Self { token, headers }
    }

    /// Checks the request's bearer token.
    ///
    /// # Returns
    /// - `Ok(())` - Token matches
    /// - `Err(AppError::AuthErr(MissingToken))` - No bearer token present
    /// - `Err(AppError::AuthErr(InvalidToken))` - Token does not match
    pub fn require(&self) -> Result<(), AppError> {
        let Some(presented) = self
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|value| !value.is_empty())
        else {
            return Err(AuthError::MissingToken.into());
        };

        if !constant_time_eq(presented.as_bytes(), self.token.as_bytes()) {
            return Err(AuthError::InvalidToken.into());
        }

        Ok(())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

//! Bearer authentication extractor and the shared CSRF check.
//!
//! A request without an `Authorization` header carries no credentials. A
//! header that is present but invalid is an authentication failure.
//! Authenticated requests with an unsafe method must also pass the CSRF check.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, ORIGIN};
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use account_auth::csrf::CsrfRequest;
use account_auth::session::MISSING_CREDENTIALS;
use account_core::error::AppError;
use account_core::result::AppResult;
use account_entity::user::User;

use crate::state::AppState;

/// An authenticated user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl std::ops::Deref for AuthUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate_bearer(parts, state)
            .await?
            .ok_or_else(|| AppError::authentication(MISSING_CREDENTIALS))?;
        enforce_csrf(parts, state)?;
        Ok(AuthUser(user))
    }
}

/// Resolve the bearer token, if any, to a user. Does not run the CSRF check.
pub(crate) async fn authenticate_bearer(
    parts: &Parts,
    state: &AppState,
) -> AppResult<Option<User>> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, token)| scheme.eq_ignore_ascii_case("Bearer") && !token.trim().is_empty())
        .map(|(_, token)| token.trim().to_string())
        .ok_or_else(|| AppError::authentication("Token prefix missing"))?;

    state.session_manager.authenticate(&token).await.map(Some)
}

/// Run the double-submit CSRF check against the request.
pub(crate) fn enforce_csrf(parts: &Parts, state: &AppState) -> AppResult<()> {
    let jar = CookieJar::from_headers(&parts.headers);
    let request = CsrfRequest {
        method: parts.method.as_str(),
        cookie_token: jar.get(state.csrf.cookie_name()).map(|c| c.value()),
        header_token: parts
            .headers
            .get(state.csrf.header_name())
            .and_then(|v| v.to_str().ok()),
        origin: parts.headers.get(ORIGIN).and_then(|v| v.to_str().ok()),
    };

    state.csrf.check(&request).map_err(AppError::from)
}

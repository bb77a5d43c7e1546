//! Refresh-cookie extractor for the refresh and logout endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use account_auth::session::RefreshSession;
use account_core::error::{AppError, ErrorKind};

use super::auth::{authenticate_bearer, enforce_csrf};
use crate::state::AppState;

/// A valid, unrevoked refresh token from the cookie, with the CSRF check passed.
///
/// When a valid bearer token is also sent, both must belong to the same user.
#[derive(Debug, Clone)]
pub struct RefreshAuth(pub RefreshSession);

impl FromRequestParts<AppState> for RefreshAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // An expired bearer is the usual reason to refresh, so only a valid
        // one takes part in the subject check.
        let bearer = match authenticate_bearer(parts, state).await {
            Ok(user) => user,
            Err(e) if e.kind == ErrorKind::Authentication => {
                debug!(reason = %e.message, "Ignoring unusable bearer on refresh");
                None
            }
            Err(e) => return Err(e),
        };

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(&state.config.auth.refresh_cookie_name)
            .map(|c| c.value().to_string());

        let session = state
            .session_manager
            .validate_refresh(token.as_deref())
            .await?;

        if let Some(user) = bearer {
            if user.id != session.user_id {
                warn!(bearer_user = %user.id, refresh_user = %session.user_id, "Token subjects differ");
                return Err(AppError::authorization(
                    "Access and refresh tokens belong to different users",
                ));
            }
        }

        enforce_csrf(parts, state)?;
        Ok(RefreshAuth(session))
    }
}

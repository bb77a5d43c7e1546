//! Auth handlers: login, refresh, logout.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;

use account_core::error::AppError;

use crate::cookies::{ensure_csrf_cookie, refresh_cookie};
use crate::dto::request::LoginRequest;
use crate::dto::response::{AccessTokenResponse, LoginResponse, MessageResponse};
use crate::extractors::{ApiJson, RefreshAuth};
use crate::state::AppState;

/// POST /api/user/login/token/
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let result = state
        .session_manager
        .login(&req.username, req.password.as_deref())
        .await?;

    let jar = ensure_csrf_cookie(&state, jar).add(refresh_cookie(
        &state,
        result.tokens.refresh.token,
    ));

    Ok((
        jar,
        Json(LoginResponse {
            access_token: result.tokens.access.token,
            account: result.account.view(),
        }),
    ))
}

/// POST /api/user/login/token/refresh/
pub async fn refresh(
    State(state): State<AppState>,
    RefreshAuth(session): RefreshAuth,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let access = state.session_manager.refresh(&session).await?;
    Ok(Json(AccessTokenResponse {
        access_token: access.token,
    }))
}

/// POST /api/user/logout/token/
pub async fn logout(
    State(state): State<AppState>,
    RefreshAuth(session): RefreshAuth,
) -> Result<Json<MessageResponse>, AppError> {
    state.session_manager.logout(&session).await?;
    Ok(Json(MessageResponse::new("You have successfully logged out")))
}

//! Enrollment handlers: registration and confirmation.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use account_core::error::AppError;
use account_service::enrollment::Registered;

use crate::cookies::{ensure_csrf_cookie, refresh_cookie};
use crate::dto::request::{ConfirmationRequest, RegistrationRequest};
use crate::dto::response::{AccessTokenResponse, MessageResponse};
use crate::extractors::ApiJson;
use crate::state::AppState;

/// POST /api/user/registration/
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<RegistrationRequest>,
) -> Result<(StatusCode, CookieJar, Json<Registered>), AppError> {
    let registered = state.enrollment_service.register(&req.into()).await?;
    Ok((
        StatusCode::CREATED,
        ensure_csrf_cookie(&state, jar),
        Json(registered),
    ))
}

/// GET /api/user/signin/{email}/{token}/
pub async fn signin_prompt(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        ensure_csrf_cookie(&state, jar),
        Json(MessageResponse::new(
            "To finish registration, tell us about your company!",
        )),
    )
}

/// POST /api/user/signin/{email}/{token}/
pub async fn signin_confirm(
    State(state): State<AppState>,
    Path((email, token)): Path<(String, String)>,
    jar: CookieJar,
    ApiJson(req): ApiJson<ConfirmationRequest>,
) -> Result<(CookieJar, Json<AccessTokenResponse>), AppError> {
    let token = Uuid::parse_str(&token).map_err(|_| AppError::not_found("Account not found"))?;

    let confirmed = state
        .enrollment_service
        .confirm(&email, token, &req.into())
        .await?;

    let jar = ensure_csrf_cookie(&state, jar).add(refresh_cookie(
        &state,
        confirmed.tokens.refresh.token,
    ));

    Ok((
        jar,
        Json(AccessTokenResponse {
            access_token: confirmed.tokens.access.token,
        }),
    ))
}

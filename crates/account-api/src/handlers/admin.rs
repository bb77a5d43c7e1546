//! Admin-only handlers.

use axum::Json;
use axum::extract::State;

use account_core::error::AppError;
use account_entity::mail_profile::MailProfile;

use crate::extractors::AdminAccount;
use crate::state::AppState;

/// GET /api/user/profile_mail/
pub async fn list_mail_profiles(
    State(state): State<AppState>,
    _admin: AdminAccount,
) -> Result<Json<Vec<MailProfile>>, AppError> {
    let profiles = state.stores.mail_profiles.list().await?;
    Ok(Json(profiles))
}

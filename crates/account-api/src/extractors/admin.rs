//! Admin-account guard.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use account_core::error::{AppError, ErrorKind};
use account_entity::account::Account;

use super::auth::AuthUser;
use crate::state::AppState;

/// An authenticated user whose account carries the admin flag.
#[derive(Debug, Clone)]
pub struct AdminAccount(pub Account);

impl FromRequestParts<AppState> for AdminAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        match state.session_manager.account_for(user.id).await {
            Ok(account) if account.is_admin => Ok(AdminAccount(account)),
            Ok(_) => Err(permission_denied()),
            Err(e) if e.kind == ErrorKind::NotFound => Err(permission_denied()),
            Err(e) => Err(e),
        }
    }
}

fn permission_denied() -> AppError {
    AppError::authorization("You do not have permission to perform this action.")
}

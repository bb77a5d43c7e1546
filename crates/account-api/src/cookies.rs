//! Refresh and CSRF cookie builders.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::state::AppState;

/// HTTP-only cookie carrying the refresh token.
pub fn refresh_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let auth = &state.config.auth;
    let mut builder = Cookie::build((auth.refresh_cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(auth.cookie_secure);

    if let Some(domain) = &auth.cookie_domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}

/// Add a fresh CSRF cookie unless the request already carried a usable one.
///
/// A cookie the guard would reject as malformed is replaced. The cookie is
/// readable by client scripts so they can echo it in the header.
pub fn ensure_csrf_cookie(state: &AppState, jar: CookieJar) -> CookieJar {
    let name = state.csrf.cookie_name();
    if jar
        .get(name)
        .is_some_and(|c| state.csrf.is_valid_token(c.value()))
    {
        return jar;
    }

    let cookie = Cookie::build((name.to_string(), state.csrf.generate_token()))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(state.config.auth.cookie_secure)
        .build();

    jar.add(cookie)
}

//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};

use crate::{
    error::AppResult,
    models::user::{AuthResponse, LoginUser, RegisterUser, User},
};

use super::{ApiResponse, AuthenticatedUser, ValidatedJson};

/// Register a member account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Account created, token issued", body = AuthResponse),
        (status = 400, description = "Invalid data or email already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<RegisterUser>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let auth = state.services.users.register(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(auth, "Registration successful"),
    ))
}

/// Log in with email and password
///
/// The token is returned in the body and also set as an HttpOnly session cookie.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginUser,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginUser>,
) -> AppResult<(CookieJar, Json<ApiResponse<AuthResponse>>)> {
    let auth = state.services.users.login(request).await?;

    let config = &state.config.auth;
    let cookie = Cookie::build((config.cookie_name.clone(), auth.token.clone()))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), ApiResponse::with_message(auth, "Login successful")))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    let cookie = Cookie::build((state.config.auth.cookie_name.clone(), "")).path("/");
    (jar.remove(cookie), ApiResponse::message("Logged out"))
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(ApiResponse::ok(user))
}

//! API handlers for Libris REST endpoints

pub mod auth;
pub mod books;
pub mod fines;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod reservations;
pub mod reviews;
pub mod stats;
pub mod users;

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
        HeaderValue, Method,
    },
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use validator::Validate;

use crate::{config::CorsConfig, error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from a JWT, taken from the
/// `Authorization: Bearer` header or else from the session cookie
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(AUTHORIZATION) {
            Some(value) => {
                let header = value
                    .to_str()
                    .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;
                header
                    .strip_prefix("Bearer ")
                    .ok_or_else(|| {
                        AppError::Authentication("Invalid authorization header format".to_string())
                    })?
                    .to_string()
            }
            None => CookieJar::from_headers(&parts.headers)
                .get(&state.config.auth.cookie_name)
                .map(|cookie| cookie.value().to_string())
                .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?,
        };

        let claims = UserClaims::from_token(&token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Success envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        })
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            errors: None,
        })
    }
}

impl ApiResponse<()> {
    /// Envelope without payload
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            message: Some(message.into()),
            errors: None,
        })
    }
}

/// JSON body extractor that also runs `validator` rules. Malformed bodies and
/// rule violations both end up as a 400 envelope.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// `Path` whose rejection is the 400 error envelope
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ApiPath(value))
    }
}

/// `Query` whose rejection is the 400 error envelope
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        .route("/books/:id/reviews", get(reviews::get_book_reviews))
        .route("/books/:id/rating", get(reviews::get_book_rating))
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::create_loan))
        .route("/loans/my", get(loans::my_loans))
        .route("/loans/check-overdue", post(loans::check_overdue))
        .route("/loans/:id/return", post(loans::return_loan))
        // Reservations
        .route(
            "/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/reservations/my", get(reservations::my_reservations))
        .route("/reservations/expire", post(reservations::expire_reservations))
        .route("/reservations/:id", delete(reservations::cancel_reservation))
        .route("/reservations/:id/approve", post(reservations::approve_reservation))
        // Fines
        .route("/fines", get(fines::list_fines).post(fines::create_fine))
        .route("/fines/my", get(fines::my_fines))
        .route("/fines/:id/pay", post(fines::pay_fine))
        // Reviews
        .route("/reviews", post(reviews::create_review))
        .route("/reviews/my", get(reviews::my_reviews))
        .route("/reviews/:id", delete(reviews::delete_review))
        // Statistics
        .route("/stats/librarian", get(stats::librarian_stats))
        .route("/stats/member", get(stats::member_stats))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/members", get(users::list_members))
        .route("/users/:id", get(users::get_user).delete(users::delete_user))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Credentialed CORS for the configured origins, or an open policy when none are set
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        .allow_credentials(true)
}

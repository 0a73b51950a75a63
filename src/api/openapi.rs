//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, fines, health, loans, reservations, reviews, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library lending REST API. Every endpoint except the health probes wraps its payload in `{success, data, message, errors}`."
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Loans
        loans::list_loans,
        loans::my_loans,
        loans::create_loan,
        loans::return_loan,
        loans::check_overdue,
        // Reservations
        reservations::list_reservations,
        reservations::my_reservations,
        reservations::create_reservation,
        reservations::approve_reservation,
        reservations::cancel_reservation,
        reservations::expire_reservations,
        // Fines
        fines::list_fines,
        fines::my_fines,
        fines::create_fine,
        fines::pay_fine,
        // Reviews
        reviews::get_book_reviews,
        reviews::get_book_rating,
        reviews::my_reviews,
        reviews::create_review,
        reviews::delete_review,
        // Stats
        stats::librarian_stats,
        stats::member_stats,
        // Users
        users::list_users,
        users::list_members,
        users::get_user,
        users::create_user,
        users::delete_user,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::RegisterUser,
            crate::models::user::LoginUser,
            crate::models::user::AuthResponse,
            // Users
            crate::models::enums::Role,
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::CreateUser,
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookInput,
            // Loans
            crate::models::enums::LoanStatus,
            crate::models::loan::CreateLoan,
            crate::models::loan::LoanDetails,
            // Reservations
            crate::models::reservation::CreateReservation,
            crate::models::reservation::ReservationDetails,
            reservations::ExpireResponse,
            // Fines
            crate::models::fine::CreateFine,
            crate::models::fine::FineDetails,
            // Reviews
            crate::models::review::CreateReview,
            crate::models::review::ReviewDetails,
            crate::models::review::BookRating,
            // Stats
            crate::models::stats::LibrarianStats,
            crate::models::stats::MemberStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "loans", description = "Loan management"),
        (name = "reservations", description = "Reservations and approvals"),
        (name = "fines", description = "Fines"),
        (name = "reviews", description = "Book reviews and ratings"),
        (name = "stats", description = "Statistics"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

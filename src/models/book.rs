//! Book (catalog entry) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    /// False while an open loan holds the book
    pub is_available: bool,
}

/// Short book representation embedded in loans, reservations and reviews
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub author: String,
}

/// Create/update book request. Availability is not part of it: it only
/// changes through loans and reservation approvals.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Author is required"))]
    pub author: String,
    #[validate(range(min = 1000, max = 2100, message = "Year must be between 1000 and 2100"))]
    pub year: i32,
    #[validate(custom(function = "not_blank", message = "Genre is required"))]
    pub genre: String,
}

impl BookInput {
    /// Trimmed copy of the text fields
    pub fn normalized(&self) -> (String, String, String) {
        (
            self.title.trim().to_string(),
            self.author.trim().to_string(),
            self.genre.trim().to_string(),
        )
    }
}

/// Book query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive search in title, author and genre
    pub search: Option<String>,
}

impl BookQuery {
    /// `%term%` LIKE pattern, or None when there is nothing to search for
    pub fn pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let escaped = s
                    .to_lowercase()
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{}%", escaped)
            })
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

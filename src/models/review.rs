//! Review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{book::BookShort, user::UserShort};

/// Review model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub review_date: DateTime<Utc>,
}

/// Internal row structure joining a review with its book and author
#[derive(Debug, Clone, FromRow)]
pub struct ReviewDetailsRow {
    id: i32,
    book_id: i32,
    user_id: i32,
    rating: i32,
    comment: Option<String>,
    review_date: DateTime<Utc>,
    book_title: String,
    book_author: String,
    user_email: String,
}

impl From<ReviewDetailsRow> for ReviewDetails {
    fn from(row: ReviewDetailsRow) -> Self {
        ReviewDetails {
            id: row.id,
            rating: row.rating,
            comment: row.comment,
            review_date: row.review_date,
            book: BookShort {
                id: row.book_id,
                title: row.book_title,
                author: row.book_author,
            },
            user: UserShort {
                id: row.user_id,
                email: row.user_email,
            },
        }
    }
}

/// Review with book and reviewer for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewDetails {
    pub id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub review_date: DateTime<Utc>,
    pub book: BookShort,
    pub user: UserShort,
}

/// Create review request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    pub book_id: i32,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: Option<String>,
}

impl CreateReview {
    /// Comment with surrounding whitespace removed; blank comments become None
    pub fn comment(&self) -> Option<String> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

/// Average rating of a book
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookRating {
    pub book_id: i32,
    /// Rounded to one decimal, 0.0 without reviews
    pub average_rating: f64,
    pub review_count: i64,
}

impl BookRating {
    pub fn new(book_id: i32, average: Option<f64>, review_count: i64) -> Self {
        Self {
            book_id,
            average_rating: average.map(round_one_decimal).unwrap_or(0.0),
            review_count,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

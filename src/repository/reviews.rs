//! Reviews repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::review::{BookRating, Review, ReviewDetails, ReviewDetailsRow},
};

const REVIEW_DETAILS_SELECT: &str = r#"
    SELECT r.id, r.book_id, r.user_id, r.rating, r.comment, r.review_date,
           b.title AS book_title, b.author AS book_author, u.email AS user_email
    FROM reviews r
    JOIN books b ON b.id = r.book_id
    JOIN users u ON u.id = r.user_id
"#;

#[derive(Clone)]
pub struct ReviewsRepository {
    pool: Pool<Postgres>,
}

impl ReviewsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Review> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))
    }

    /// Reviews of a book, newest first
    pub async fn list_by_book(&self, book_id: i32) -> AppResult<Vec<ReviewDetails>> {
        let query = format!(
            "{} WHERE r.book_id = $1 ORDER BY r.review_date DESC, r.id DESC",
            REVIEW_DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, ReviewDetailsRow>(&query)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ReviewDetails::from).collect())
    }

    /// Reviews written by a user, newest first
    pub async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<ReviewDetails>> {
        let query = format!(
            "{} WHERE r.user_id = $1 ORDER BY r.review_date DESC, r.id DESC",
            REVIEW_DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, ReviewDetailsRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ReviewDetails::from).collect())
    }

    pub async fn exists_for(&self, book_id: i32, user_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE book_id = $1 AND user_id = $2)",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Average rating and review count of a book
    pub async fn rating(&self, book_id: i32) -> AppResult<BookRating> {
        let (average, count): (Option<f64>, i64) = sqlx::query_as(
            "SELECT AVG(rating)::float8, COUNT(*) FROM reviews WHERE book_id = $1",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(BookRating::new(book_id, average, count))
    }

    /// Store a review; reviews_book_user_key rejects a second one per book and user
    pub async fn create(
        &self,
        book_id: i32,
        user_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> AppResult<ReviewDetails> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (book_id, user_id, rating, comment, review_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        let query = format!("{} WHERE r.id = $1", REVIEW_DETAILS_SELECT);
        let row = sqlx::query_as::<_, ReviewDetailsRow>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Review not found".to_string()));
        }
        Ok(())
    }
}

//! Book reviews service

use crate::{
    error::{AppError, AppResult},
    models::review::{BookRating, CreateReview, ReviewDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReviewsService {
    repository: Repository,
}

impl ReviewsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_book_reviews(&self, book_id: i32) -> AppResult<Vec<ReviewDetails>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.reviews.list_by_book(book_id).await
    }

    pub async fn get_book_rating(&self, book_id: i32) -> AppResult<BookRating> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.reviews.rating(book_id).await
    }

    pub async fn get_user_reviews(&self, user_id: i32) -> AppResult<Vec<ReviewDetails>> {
        self.repository.reviews.list_by_user(user_id).await
    }

    /// One review per member and book
    pub async fn create_review(&self, user_id: i32, request: CreateReview) -> AppResult<ReviewDetails> {
        self.repository.books.get_by_id(request.book_id).await?;

        if self.repository.reviews.exists_for(request.book_id, user_id).await? {
            return Err(AppError::BadRequest("You have already reviewed this book".to_string()));
        }

        let review = self
            .repository
            .reviews
            .create(request.book_id, user_id, request.rating, request.comment())
            .await?;
        tracing::info!("Review {} added to book {} by user {}", review.id, review.book.id, user_id);
        Ok(review)
    }

    /// Members may only delete their own reviews
    pub async fn delete_review(&self, id: i32, user_id: i32) -> AppResult<()> {
        let review = self.repository.reviews.get_by_id(id).await?;
        if review.user_id != user_id {
            return Err(AppError::Authorization("You can only delete your own reviews".to_string()));
        }
        self.repository.reviews.delete(id).await?;
        tracing::info!("Review {} deleted", id);
        Ok(())
    }
}

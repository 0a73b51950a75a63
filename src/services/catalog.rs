//! Catalog service for managing books

use crate::{
    error::AppResult,
    models::book::{Book, BookInput, BookQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, input: BookInput) -> AppResult<Book> {
        let book = self.repository.books.create(&input).await?;
        tracing::info!("Added book {} \"{}\"", book.id, book.title);
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, input: BookInput) -> AppResult<Book> {
        let book = self.repository.books.update(id, &input).await?;
        tracing::info!("Updated book {}", book.id);
        Ok(book)
    }

    /// Delete a book together with its loan, reservation and review history
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}

//! Books repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookInput, BookQuery},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// List books, optionally filtered on title, author or genre
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE $1::text IS NULL
               OR LOWER(title) LIKE $1
               OR LOWER(author) LIKE $1
               OR LOWER(genre) LIKE $1
            ORDER BY title, id
            "#,
        )
        .bind(query.pattern())
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Create a new, available book
    pub async fn create(&self, input: &BookInput) -> AppResult<Book> {
        let (title, author, genre) = input.normalized();
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, year, genre, is_available)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(input.year)
        .bind(genre)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    /// Update bibliographic fields; availability is left as is
    pub async fn update(&self, id: i32, input: &BookInput) -> AppResult<Book> {
        let (title, author, genre) = input.normalized();
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $1, author = $2, year = $3, genre = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(input.year)
        .bind(genre)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Delete a book with its loans, reservations and reviews (ON DELETE CASCADE)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        Ok(())
    }
}

/// Lock a book row for the rest of the transaction
pub(crate) async fn lock_book(conn: &mut PgConnection, id: i32) -> AppResult<Book> {
    sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
}

pub(crate) async fn set_availability(conn: &mut PgConnection, id: i32, available: bool) -> AppResult<()> {
    sqlx::query("UPDATE books SET is_available = $1 WHERE id = $2")
        .bind(available)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

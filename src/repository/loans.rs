//! Loans repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use super::books::{lock_book, set_availability};
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::LoanStatus,
        loan::{self, Loan, LoanDetails, LoanDetailsRow},
    },
};

const LOAN_DETAILS_SELECT: &str = r#"
    SELECT l.id, l.book_id, l.user_id, l.loan_date, l.due_date, l.return_date, l.status,
           b.title AS book_title, b.author AS book_author, u.email AS user_email
    FROM loans l
    JOIN books b ON b.id = l.book_id
    JOIN users u ON u.id = l.user_id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List loans, newest first, optionally for a single borrower
    pub async fn list(&self, user_id: Option<i32>) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE ($1::int IS NULL OR l.user_id = $1) ORDER BY l.loan_date DESC, l.id DESC",
            LOAN_DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, LoanDetailsRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(LoanDetails::from).collect())
    }

    /// Lend an available book. The book row stays locked until commit, so
    /// two concurrent loans of the same book cannot both succeed.
    pub async fn create(&self, book_id: i32, user_id: i32, days: i64) -> AppResult<LoanDetails> {
        let mut tx = self.pool.begin().await?;

        let book = lock_book(&mut tx, book_id).await?;
        if !book.is_available {
            return Err(AppError::BadRequest("Book is not available".to_string()));
        }

        let user_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        if !user_exists {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let loan_id = insert_active_loan(&mut tx, book_id, user_id, Utc::now(), days).await?;
        set_availability(&mut tx, book_id, false).await?;
        let details = get_details(&mut tx, loan_id).await?;

        tx.commit().await?;
        Ok(details)
    }

    /// Return a loan and make its book available again. A second return of
    /// the same loan is rejected.
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<LoanDetails> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Loan not found".to_string()))?;

        loan.ensure_returnable()?;

        sqlx::query("UPDATE loans SET status = $1, return_date = $2 WHERE id = $3")
            .bind(LoanStatus::Returned)
            .bind(Utc::now())
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;
        set_availability(&mut tx, loan.book_id, true).await?;
        let details = get_details(&mut tx, loan_id).await?;

        tx.commit().await?;
        Ok(details)
    }

    /// Move every Active loan due before `now` to Overdue. Returns the loans
    /// that changed; Overdue and Returned loans are left alone.
    pub async fn mark_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            r#"
            WITH updated AS (
                UPDATE loans SET status = 'Overdue'
                WHERE status = 'Active' AND due_date < $1
                RETURNING *
            )
            {}
            ORDER BY l.due_date
            "#,
            LOAN_DETAILS_SELECT.replacen("FROM loans l", "FROM updated l", 1)
        );
        let rows = sqlx::query_as::<_, LoanDetailsRow>(&query)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(LoanDetails::from).collect())
    }
}

/// Insert an Active loan starting at `start` and return its id
pub(crate) async fn insert_active_loan(
    conn: &mut PgConnection,
    book_id: i32,
    user_id: i32,
    start: DateTime<Utc>,
    days: i64,
) -> AppResult<i32> {
    let loan_id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO loans (book_id, user_id, loan_date, due_date, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(book_id)
    .bind(user_id)
    .bind(start)
    .bind(loan::due_date(start, days))
    .bind(LoanStatus::Active)
    .fetch_one(conn)
    .await?;
    Ok(loan_id)
}

pub(crate) async fn get_details(conn: &mut PgConnection, loan_id: i32) -> AppResult<LoanDetails> {
    let query = format!("{} WHERE l.id = $1", LOAN_DETAILS_SELECT);
    sqlx::query_as::<_, LoanDetailsRow>(&query)
        .bind(loan_id)
        .fetch_optional(conn)
        .await?
        .map(LoanDetails::from)
        .ok_or_else(|| AppError::NotFound("Loan not found".to_string()))
}

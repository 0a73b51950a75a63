//! Loan management service

use chrono::Utc;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, LoanDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    loan_days: i64,
}

impl LoansService {
    pub fn new(repository: Repository, loan_days: i64) -> Self {
        Self {
            repository,
            loan_days,
        }
    }

    /// All loans, newest first
    pub async fn list_loans(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list(None).await
    }

    /// Loans of a user, newest first
    pub async fn get_user_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list(Some(user_id)).await
    }

    /// Lend a book to a user
    pub async fn create_loan(&self, request: CreateLoan) -> AppResult<LoanDetails> {
        let days = request.days.unwrap_or(self.loan_days);
        let loan = self
            .repository
            .loans
            .create(request.book_id, request.user_id, days)
            .await?;
        tracing::info!(
            "Loan {} created: book {} to user {}, due {}",
            loan.id,
            loan.book.id,
            loan.user.id,
            loan.due_date
        );
        Ok(loan)
    }

    /// Return a borrowed book
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<LoanDetails> {
        let loan = self.repository.loans.return_loan(loan_id).await?;
        tracing::info!("Loan {} returned, book {} available", loan.id, loan.book.id);
        Ok(loan)
    }

    /// Flag Active loans past their due date as Overdue
    pub async fn check_overdue(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = self.repository.loans.mark_overdue(Utc::now()).await?;
        if !loans.is_empty() {
            tracing::info!("{} loan(s) marked overdue", loans.len());
        }
        Ok(loans)
    }
}

//! Repository tests against a real PostgreSQL database
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored
//! Migrations are applied on connect. Rows are seeded directly so due and
//! expiry dates can sit in the past.

use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool};

use libris_server::{
    config::AppConfig,
    models::{
        book::BookInput,
        enums::{LoanStatus, Role},
        user::User,
    },
    repository::Repository,
    AppError,
};

async fn repository() -> (Repository, PgPool) {
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| AppConfig::default().database.url);
    let pool = PgPoolOptions::new().connect(&url).await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    (Repository::new(pool.clone()), pool)
}

async fn member(repository: &Repository) -> User {
    let email = format!("repo_{}@test.com", Utc::now().timestamp_nanos_opt().unwrap());
    repository
        .users
        .create(&email, "not-a-real-hash", Role::Member)
        .await
        .unwrap()
}

async fn book(repository: &Repository, title: &str) -> i32 {
    let input = BookInput {
        title: title.to_string(),
        author: "Danilo Kis".to_string(),
        year: 1976,
        genre: "Novel".to_string(),
    };
    repository.books.create(&input).await.unwrap().id
}

async fn loan_status(repository: &Repository, user_id: i32, loan_id: i32) -> LoanStatus {
    repository
        .loans
        .list(Some(user_id))
        .await
        .unwrap()
        .into_iter()
        .find(|loan| loan.id == loan_id)
        .unwrap()
        .status
}

#[tokio::test]
#[ignore]
async fn overdue_sweep_moves_only_active_loans_past_due() {
    let (repository, pool) = repository().await;
    let user = member(&repository).await;

    let past_due = repository
        .loans
        .create(book(&repository, "Grobnica za Borisa Davidovica").await, user.id, 14)
        .await
        .unwrap();
    let already_overdue = repository
        .loans
        .create(book(&repository, "Basta, pepeo").await, user.id, 14)
        .await
        .unwrap();
    let current = repository
        .loans
        .create(book(&repository, "Pescanik").await, user.id, 14)
        .await
        .unwrap();
    let returned = repository
        .loans
        .create(book(&repository, "Rani jadi").await, user.id, 14)
        .await
        .unwrap();
    repository.loans.return_loan(returned.id).await.unwrap();

    sqlx::query("UPDATE loans SET due_date = NOW() - INTERVAL '2 days' WHERE id = ANY($1)")
        .bind(vec![past_due.id, already_overdue.id, returned.id])
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE loans SET status = 'Overdue' WHERE id = $1")
        .bind(already_overdue.id)
        .execute(&pool)
        .await
        .unwrap();

    let swept: Vec<i32> = repository
        .loans
        .mark_overdue(Utc::now())
        .await
        .unwrap()
        .into_iter()
        .map(|loan| loan.id)
        .collect();

    assert!(swept.contains(&past_due.id));
    assert!(!swept.contains(&already_overdue.id));
    assert!(!swept.contains(&current.id));
    assert!(!swept.contains(&returned.id));

    assert_eq!(loan_status(&repository, user.id, past_due.id).await, LoanStatus::Overdue);
    assert_eq!(loan_status(&repository, user.id, already_overdue.id).await, LoanStatus::Overdue);
    assert_eq!(loan_status(&repository, user.id, current.id).await, LoanStatus::Active);
    assert_eq!(loan_status(&repository, user.id, returned.id).await, LoanStatus::Returned);

    // A second sweep has nothing left to move for these loans
    let again = repository.loans.mark_overdue(Utc::now()).await.unwrap();
    assert!(again.iter().all(|loan| loan.id != past_due.id));
}

#[tokio::test]
#[ignore]
async fn expiry_deletes_only_pending_reservations_past_expiry() {
    let (repository, pool) = repository().await;
    let user = member(&repository).await;

    let expired = repository
        .reservations
        .create(book(&repository, "Enciklopedija mrtvih").await, user.id, 7)
        .await
        .unwrap();
    let pending = repository
        .reservations
        .create(book(&repository, "Psalam 44").await, user.id, 7)
        .await
        .unwrap();
    let approved = repository
        .reservations
        .create(book(&repository, "Mansarda").await, user.id, 7)
        .await
        .unwrap();
    repository.reservations.approve(approved.id, 14).await.unwrap();

    sqlx::query(
        "UPDATE reservations SET expiry_date = NOW() - INTERVAL '1 day' WHERE id = ANY($1)",
    )
    .bind(vec![expired.id, approved.id])
    .execute(&pool)
    .await
    .unwrap();

    let deleted = repository.reservations.delete_expired(Utc::now()).await.unwrap();

    assert!(deleted >= 1);
    assert!(matches!(
        repository.reservations.get_by_id(expired.id).await,
        Err(AppError::NotFound(_))
    ));
    let pending = repository.reservations.get_by_id(pending.id).await.unwrap();
    assert!(!pending.is_approved);
    let approved = repository.reservations.get_by_id(approved.id).await.unwrap();
    assert!(approved.is_approved);
}

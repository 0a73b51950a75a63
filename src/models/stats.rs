//! Dashboard statistics

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Library-wide counters for librarians
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LibrarianStats {
    pub total_books: i64,
    pub available_books: i64,
    pub total_loans: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
    pub pending_reservations: i64,
    pub total_members: i64,
}

/// Personal counters for a member
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MemberStats {
    pub my_active_loans: i64,
    pub my_pending_reservations: i64,
    pub available_books: i64,
}

//! Statistics service

use crate::{
    error::AppResult,
    models::stats::{LibrarianStats, MemberStats},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn librarian_stats(&self) -> AppResult<LibrarianStats> {
        self.repository.stats.librarian().await
    }

    pub async fn member_stats(&self, user_id: i32) -> AppResult<MemberStats> {
        self.repository.stats.member(user_id).await
    }
}

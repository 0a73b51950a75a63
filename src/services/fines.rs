//! Fines service

use crate::{
    error::AppResult,
    models::fine::{CreateFine, FineDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct FinesService {
    repository: Repository,
}

impl FinesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_fines(&self) -> AppResult<Vec<FineDetails>> {
        self.repository.fines.list(None).await
    }

    pub async fn get_user_fines(&self, user_id: i32) -> AppResult<Vec<FineDetails>> {
        self.repository.fines.list(Some(user_id)).await
    }

    pub async fn create_fine(&self, request: CreateFine) -> AppResult<FineDetails> {
        let fine = self
            .repository
            .fines
            .create(request.user_id, request.amount, &request.reason)
            .await?;
        tracing::info!("Fine {} of {} issued to user {}", fine.id, fine.amount, fine.user.id);
        Ok(fine)
    }

    pub async fn mark_paid(&self, id: i32) -> AppResult<FineDetails> {
        let fine = self.repository.fines.mark_paid(id).await?;
        tracing::info!("Fine {} paid", fine.id);
        Ok(fine)
    }
}

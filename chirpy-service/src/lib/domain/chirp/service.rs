use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::CreateChirpCommand;
use crate::domain::chirp::models::ListChirpsQuery;
use crate::domain::chirp::ports::ChirpRepository;
use crate::domain::chirp::ports::ChirpServicePort;
use crate::domain::user::models::UserId;

/// Domain service implementation for chirp operations.
pub struct ChirpService<CR>
where
    CR: ChirpRepository,
{
    repository: Arc<CR>,
}

impl<CR> ChirpService<CR>
where
    CR: ChirpRepository,
{
    pub fn new(repository: Arc<CR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<CR> ChirpServicePort for ChirpService<CR>
where
    CR: ChirpRepository,
{
    async fn create_chirp(&self, command: CreateChirpCommand) -> Result<Chirp, ChirpError> {
        let now = Utc::now();

        let chirp = Chirp {
            id: ChirpId::new(),
            body: command.body,
            user_id: command.author,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(chirp).await?;
        tracing::info!(chirp_id = %created.id, user_id = %created.user_id, "Chirp created");

        Ok(created)
    }

    async fn list_chirps(&self, query: ListChirpsQuery) -> Result<Vec<Chirp>, ChirpError> {
        self.repository.list(&query).await
    }

    async fn get_chirp(&self, id: &ChirpId) -> Result<Chirp, ChirpError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ChirpError::NotFound(*id))
    }

    async fn delete_chirp(&self, id: &ChirpId, requester: &UserId) -> Result<(), ChirpError> {
        let chirp = self.get_chirp(id).await?;

        if chirp.user_id != *requester {
            return Err(ChirpError::NotAuthor {
                user_id: *requester,
                chirp_id: *id,
            });
        }

        self.repository.delete(id).await?;
        tracing::info!(chirp_id = %id, "Chirp deleted");

        Ok(())
    }
}

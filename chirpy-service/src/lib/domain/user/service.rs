use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::events::PaymentEvent;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::errors::UserError;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Hash on the blocking pool so request tasks are not stalled by Argon2.
    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let hasher = self.password_hasher;

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(command.password).await?;
        let now = Utc::now();

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User created");

        Ok(created_user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFoundByEmail(email.to_string()))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_email) = command.email {
            user.email = new_email;
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.hash_password(new_password).await?;
        }

        user.updated_at = Utc::now();

        self.repository.update(user).await
    }

    async fn handle_payment_event(&self, event: PaymentEvent) -> Result<Option<User>, UserError> {
        match event {
            PaymentEvent::UserUpgraded { user_id } => {
                let id = UserId::from_string(&user_id)?;
                let user = self.repository.set_chirpy_red(&id).await?;
                tracing::info!(user_id = %user.id, "User upgraded to Chirpy Red");
                Ok(Some(user))
            }
            PaymentEvent::Ignored(name) => {
                tracing::debug!(event = %name, "Ignoring payment event");
                Ok(None)
            }
        }
    }

    async fn delete_all_users(&self) -> Result<(), UserError> {
        self.repository.delete_all().await?;
        tracing::warn!("All users deleted");
        Ok(())
    }
}

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::db::RepositoryError;
use crate::modules::users::model::User;

/// Lookup used by login and by the authentication middleware.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<User, RepositoryError>;
    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError>;
}

#[derive(Clone, Debug)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password, role, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }
}

/// Process-local store, used by tests and local demos.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// `password_hash` is stored as given; hash it first.
    pub async fn insert(&self, email: &str, password_hash: &str, role: &str) -> User {
        let mut users = self.users.write().await;
        let now = Utc::now();
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            email: email.to_string(),
            password: password_hash.to_string(),
            role: role.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: i32) -> Result<User, RepositoryError> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

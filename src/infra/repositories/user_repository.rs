//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address (exact, case-sensitive match)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find users matching any of the given IDs
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;

    /// Create a new user
    async fn create(&self, user: NewUser) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        insert_user(&self.db, new_user).await
    }
}

/// Insert over any connection, so the same write works inside and
/// outside a transaction.
pub(crate) async fn insert_user<C: ConnectionTrait>(conn: &C, new_user: NewUser) -> AppResult<User> {
    let now = chrono::Utc::now();
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        email: Set(new_user.email),
        password_hash: Set(new_user.password_hash),
        phone: Set(new_user.phone),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(AppError::from)?;

    Ok(User::from(model))
}

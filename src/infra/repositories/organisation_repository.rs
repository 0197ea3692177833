//! Organisation repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::entities::organisation::{self, ActiveModel, Entity as OrganisationEntity};
use crate::domain::{NewOrganisation, Organisation};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Organisation repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrganisationRepository: Send + Sync {
    /// Find organisation by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organisation>>;

    /// Find organisations matching any of the given IDs
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Organisation>>;

    /// Create a new organisation
    async fn create(&self, org: NewOrganisation) -> AppResult<Organisation>;
}

/// Concrete implementation of OrganisationRepository
pub struct OrganisationStore {
    db: DatabaseConnection,
}

impl OrganisationStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrganisationRepository for OrganisationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organisation>> {
        let result = OrganisationEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Organisation::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Organisation>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = OrganisationEntity::find()
            .filter(organisation::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Organisation::from).collect())
    }

    async fn create(&self, org: NewOrganisation) -> AppResult<Organisation> {
        insert_organisation(&self.db, org).await
    }
}

/// Insert over any connection, so the same write works inside and
/// outside a transaction.
pub(crate) async fn insert_organisation<C: ConnectionTrait>(
    conn: &C,
    org: NewOrganisation,
) -> AppResult<Organisation> {
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(org.name),
        description: Set(org.description),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(conn)
    .await
    .map_err(AppError::from)?;

    Ok(Organisation::from(model))
}

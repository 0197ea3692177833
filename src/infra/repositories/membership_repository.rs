//! Membership link repository implementation.
//!
//! Inserts are idempotent: conflicts on the composite (user_id, org_id)
//! key resolve as DO NOTHING, so a duplicate link never creates a second
//! row and never surfaces an error.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::membership::{self, ActiveModel, Entity as MembershipEntity};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Membership repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Check whether an exact (user, organisation) link exists
    async fn is_linked(&self, user_id: Uuid, org_id: Uuid) -> AppResult<bool>;

    /// List the organisation IDs a user is linked to
    async fn list_org_ids_for_user(&self, user_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// List the user IDs linked to an organisation
    async fn list_user_ids_for_organisation(&self, org_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Insert a membership link; inserting an existing pair is a no-op
    async fn insert(&self, user_id: Uuid, org_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of MembershipRepository
pub struct MembershipStore {
    db: DatabaseConnection,
}

impl MembershipStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MembershipRepository for MembershipStore {
    async fn is_linked(&self, user_id: Uuid, org_id: Uuid) -> AppResult<bool> {
        let result = MembershipEntity::find_by_id((user_id, org_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.is_some())
    }

    async fn list_org_ids_for_user(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = MembershipEntity::find()
            .filter(membership::Column::UserId.eq(user_id))
            .select_only()
            .column(membership::Column::OrgId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(ids)
    }

    async fn list_user_ids_for_organisation(&self, org_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = MembershipEntity::find()
            .filter(membership::Column::OrgId.eq(org_id))
            .select_only()
            .column(membership::Column::UserId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(ids)
    }

    async fn insert(&self, user_id: Uuid, org_id: Uuid) -> AppResult<()> {
        insert_membership(&self.db, user_id, org_id).await
    }
}

/// Idempotent link insert over any connection, so the same write works
/// inside and outside a transaction.
pub(crate) async fn insert_membership<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    org_id: Uuid,
) -> AppResult<()> {
    let link = ActiveModel {
        user_id: Set(user_id),
        org_id: Set(org_id),
    };
    let conflict = OnConflict::columns([membership::Column::UserId, membership::Column::OrgId])
        .do_nothing()
        .to_owned();

    MembershipEntity::insert(link)
        .on_conflict(conflict)
        .exec_without_returning(conn)
        .await
        .map_err(AppError::from)?;

    Ok(())
}

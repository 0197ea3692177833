//! Unit of Work: repository access plus the transactional boundary.
//!
//! Two writes in this system span more than one table - registration
//! (user + default organisation + membership) and organisation creation
//! (organisation + creator membership). Both run inside a single
//! transaction; partial failure must never leave an organisation with
//! zero members or a user without a default organisation.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    insert_membership, insert_organisation, insert_user, MembershipRepository, MembershipStore,
    OrganisationRepository, OrganisationStore, UserRepository, UserStore,
};
use crate::domain::{NewOrganisation, NewUser, Organisation, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Store handle injected into the services: per-table repositories and
/// the named multi-table atomic writes.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn organisations(&self) -> Arc<dyn OrganisationRepository>;

    fn memberships(&self) -> Arc<dyn MembershipRepository>;

    /// Insert a user, their default organisation, and the membership
    /// link as one transaction.
    async fn create_user_with_default_org(
        &self,
        user: NewUser,
        org: NewOrganisation,
    ) -> AppResult<(User, Organisation)>;

    /// Insert an organisation and its creator's membership link as one
    /// transaction.
    async fn create_organisation_with_owner(
        &self,
        org: NewOrganisation,
        owner_id: Uuid,
    ) -> AppResult<Organisation>;
}

/// Unit of Work over a live SeaORM connection.
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    org_repo: Arc<OrganisationStore>,
    membership_repo: Arc<MembershipStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            org_repo: Arc::new(OrganisationStore::new(db.clone())),
            membership_repo: Arc::new(MembershipStore::new(db.clone())),
            db,
        }
    }

    async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)
    }
}

/// Commit on success; roll back (and keep the original error) on failure.
async fn finish<T>(txn: DatabaseTransaction, outcome: AppResult<T>) -> AppResult<T> {
    match outcome {
        Ok(value) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn organisations(&self) -> Arc<dyn OrganisationRepository> {
        self.org_repo.clone()
    }

    fn memberships(&self) -> Arc<dyn MembershipRepository> {
        self.membership_repo.clone()
    }

    async fn create_user_with_default_org(
        &self,
        user: NewUser,
        org: NewOrganisation,
    ) -> AppResult<(User, Organisation)> {
        let txn = self.begin().await?;
        let outcome = async {
            let user = insert_user(&txn, user).await?;
            let org = insert_organisation(&txn, org).await?;
            insert_membership(&txn, user.id, org.id).await?;
            Ok((user, org))
        }
        .await;

        finish(txn, outcome).await
    }

    async fn create_organisation_with_owner(
        &self,
        org: NewOrganisation,
        owner_id: Uuid,
    ) -> AppResult<Organisation> {
        let txn = self.begin().await?;
        let outcome = async {
            let org = insert_organisation(&txn, org).await?;
            insert_membership(&txn, owner_id, org.id).await?;
            Ok(org)
        }
        .await;

        finish(txn, outcome).await
    }
}

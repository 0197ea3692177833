//! Access control core - per-operation decision pipelines.
//!
//! Every protected operation runs an ordered early-exit check sequence
//! over an already-verified actor identity. Two deliberate response
//! shapes encode the confidentiality rules:
//!
//! - user lookups conceal out-of-scope records as `NotFound`, so a
//!   caller cannot learn whether a user id exists outside their tenants;
//! - organisation lookups acknowledge existence but answer `Forbidden`
//!   for non-members, since organisation existence is not sensitive.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewOrganisation, Organisation, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::services::MembershipResolver;

/// Access control service trait for dependency injection.
#[async_trait]
pub trait AccessService: Send + Sync {
    /// Read a user record on behalf of an actor.
    async fn get_user(&self, actor_id: Uuid, target_id: Uuid) -> AppResult<User>;

    /// List the organisations the actor belongs to.
    async fn list_organisations(&self, actor_id: Uuid) -> AppResult<Vec<Organisation>>;

    /// Read an organisation on behalf of an actor.
    async fn get_organisation(&self, actor_id: Uuid, org_id: Uuid) -> AppResult<Organisation>;

    /// Create an organisation owned by the actor.
    async fn create_organisation(
        &self,
        actor_id: Uuid,
        org: NewOrganisation,
    ) -> AppResult<Organisation>;

    /// Add a user to an organisation.
    async fn add_member(&self, org_id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// List the members of an organisation on behalf of an actor.
    async fn list_members(&self, actor_id: Uuid, org_id: Uuid) -> AppResult<Vec<User>>;
}

/// Concrete implementation of AccessService.
pub struct Gatekeeper<U: UnitOfWork> {
    uow: Arc<U>,
    resolver: Arc<dyn MembershipResolver>,
}

impl<U: UnitOfWork> Gatekeeper<U> {
    /// Create new access control instance with Unit of Work and resolver
    pub fn new(uow: Arc<U>, resolver: Arc<dyn MembershipResolver>) -> Self {
        Self { uow, resolver }
    }

    /// Fetch an organisation, concealing nothing: absent means NotFound,
    /// present but non-member means Forbidden.
    async fn authorised_organisation(
        &self,
        actor_id: Uuid,
        org_id: Uuid,
    ) -> AppResult<Organisation> {
        let org = self
            .uow
            .organisations()
            .find_by_id(org_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !self.resolver.is_member(actor_id, org_id).await? {
            return Err(AppError::Forbidden);
        }

        Ok(org)
    }
}

#[async_trait]
impl<U: UnitOfWork> AccessService for Gatekeeper<U> {
    async fn get_user(&self, actor_id: Uuid, target_id: Uuid) -> AppResult<User> {
        // Self-access short-circuit: a user may always read their own record
        if actor_id == target_id {
            return self
                .uow
                .users()
                .find_by_id(target_id)
                .await?
                .ok_or(AppError::NotFound);
        }

        // Out-of-scope targets are reported as absent, not forbidden
        if !self
            .resolver
            .shares_organisation(actor_id, target_id)
            .await?
        {
            return Err(AppError::NotFound);
        }

        self.uow
            .users()
            .find_by_id(target_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_organisations(&self, actor_id: Uuid) -> AppResult<Vec<Organisation>> {
        let org_ids = self
            .uow
            .memberships()
            .list_org_ids_for_user(actor_id)
            .await?;

        self.uow.organisations().find_by_ids(org_ids).await
    }

    async fn get_organisation(&self, actor_id: Uuid, org_id: Uuid) -> AppResult<Organisation> {
        self.authorised_organisation(actor_id, org_id).await
    }

    async fn create_organisation(
        &self,
        actor_id: Uuid,
        org: NewOrganisation,
    ) -> AppResult<Organisation> {
        // Organisation and creator membership persist together or not at all
        let org = self
            .uow
            .create_organisation_with_owner(org, actor_id)
            .await?;

        tracing::info!(org_id = %org.id, owner_id = %actor_id, "Organisation created");
        Ok(org)
    }

    async fn add_member(&self, org_id: Uuid, user_id: Uuid) -> AppResult<()> {
        // Referenced entities must exist before the link is written
        if self
            .uow
            .organisations()
            .find_by_id(org_id)
            .await?
            .is_none()
        {
            return Err(AppError::bad_request("Organisation does not exist"));
        }

        if self.uow.users().find_by_id(user_id).await?.is_none() {
            return Err(AppError::bad_request("User does not exist"));
        }

        // Duplicate links are a no-op
        self.uow.memberships().insert(user_id, org_id).await?;

        tracing::info!(org_id = %org_id, user_id = %user_id, "Member added to organisation");
        Ok(())
    }

    async fn list_members(&self, actor_id: Uuid, org_id: Uuid) -> AppResult<Vec<User>> {
        self.authorised_organisation(actor_id, org_id).await?;

        let user_ids = self
            .uow
            .memberships()
            .list_user_ids_for_organisation(org_id)
            .await?;

        self.uow.users().find_by_ids(user_ids).await
    }
}

//! Membership resolver - answers visibility questions from membership links.
//!
//! Both operations are pure reads against the store; authorization
//! decisions are taken by the access control service on top of them.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Membership resolver trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MembershipResolver: Send + Sync {
    /// True iff the two users are linked to at least one common
    /// organisation. Symmetric in its arguments.
    async fn shares_organisation(&self, user_a: Uuid, user_b: Uuid) -> AppResult<bool>;

    /// True iff the exact (user, organisation) link exists.
    async fn is_member(&self, user_id: Uuid, org_id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of MembershipResolver backed by the store.
pub struct MembershipService<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> MembershipService<U> {
    /// Create new resolver instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> MembershipResolver for MembershipService<U> {
    async fn shares_organisation(&self, user_a: Uuid, user_b: Uuid) -> AppResult<bool> {
        // A user trivially shares an organisation with themself
        if user_a == user_b {
            return Ok(true);
        }

        let memberships = self.uow.memberships();
        let orgs_a = memberships.list_org_ids_for_user(user_a).await?;
        if orgs_a.is_empty() {
            return Ok(false);
        }

        let orgs_b: HashSet<Uuid> = memberships
            .list_org_ids_for_user(user_b)
            .await?
            .into_iter()
            .collect();

        Ok(orgs_a.iter().any(|org| orgs_b.contains(org)))
    }

    async fn is_member(&self, user_id: Uuid, org_id: Uuid) -> AppResult<bool> {
        self.uow.memberships().is_linked(user_id, org_id).await
    }
}

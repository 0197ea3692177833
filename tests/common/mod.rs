//! Shared test fixtures: an in-memory credential store implementing the
//! repository and Unit of Work traits, plus helpers for wiring real
//! services on top of it.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use tenancy_api::domain::{NewOrganisation, NewUser, Organisation, Registration, User};
use tenancy_api::errors::{AppError, AppResult};
use tenancy_api::infra::{
    Database, MembershipRepository, OrganisationRepository, UnitOfWork, UserRepository,
};
use tenancy_api::services::{
    AccessService, Authenticator, Gatekeeper, MembershipResolver, MembershipService, TokenService,
};
use tenancy_api::AppState;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

/// In-memory credential store. Mirrors the durable store's semantics:
/// unique user ids, membership pairs as a set (duplicate links collapse).
#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    orgs: Mutex<HashMap<Uuid, Organisation>>,
    memberships: Mutex<HashSet<(Uuid, Uuid)>>,
    /// When set, multi-row atomic writes fail before persisting anything,
    /// simulating a transaction rollback.
    pub fail_atomic_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert_user(&self, new_user: NewUser) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            phone: new_user.phone,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        user
    }

    pub fn insert_org(&self, org: NewOrganisation) -> Organisation {
        let org = Organisation {
            id: Uuid::new_v4(),
            name: org.name,
            description: org.description,
            created_at: Utc::now(),
        };
        self.orgs.lock().unwrap().insert(org.id, org.clone());
        org
    }

    pub fn link(&self, user_id: Uuid, org_id: Uuid) {
        self.memberships.lock().unwrap().insert((user_id, org_id));
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn org_count(&self) -> usize {
        self.orgs.lock().unwrap().len()
    }

    pub fn membership_count(&self) -> usize {
        self.memberships.lock().unwrap().len()
    }
}

pub struct InMemoryUsers(pub Arc<InMemoryStore>);

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.0.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        let users = self.0.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        Ok(self.0.insert_user(user))
    }
}

pub struct InMemoryOrganisations(pub Arc<InMemoryStore>);

#[async_trait]
impl OrganisationRepository for InMemoryOrganisations {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organisation>> {
        Ok(self.0.orgs.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Organisation>> {
        let orgs = self.0.orgs.lock().unwrap();
        Ok(ids.iter().filter_map(|id| orgs.get(id).cloned()).collect())
    }

    async fn create(&self, org: NewOrganisation) -> AppResult<Organisation> {
        Ok(self.0.insert_org(org))
    }
}

pub struct InMemoryMemberships(pub Arc<InMemoryStore>);

#[async_trait]
impl MembershipRepository for InMemoryMemberships {
    async fn is_linked(&self, user_id: Uuid, org_id: Uuid) -> AppResult<bool> {
        Ok(self
            .0
            .memberships
            .lock()
            .unwrap()
            .contains(&(user_id, org_id)))
    }

    async fn list_org_ids_for_user(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .0
            .memberships
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, o)| *o)
            .collect())
    }

    async fn list_user_ids_for_organisation(&self, org_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .0
            .memberships
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, o)| *o == org_id)
            .map(|(u, _)| *u)
            .collect())
    }

    async fn insert(&self, user_id: Uuid, org_id: Uuid) -> AppResult<()> {
        self.0.link(user_id, org_id);
        Ok(())
    }
}

/// Unit of Work over the in-memory store. Atomic operations either
/// persist every row or, when `fail_atomic_writes` is set, none.
pub struct InMemoryUow {
    pub store: Arc<InMemoryStore>,
}

impl InMemoryUow {
    pub fn new(store: Arc<InMemoryStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUow {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(InMemoryUsers(self.store.clone()))
    }

    fn organisations(&self) -> Arc<dyn OrganisationRepository> {
        Arc::new(InMemoryOrganisations(self.store.clone()))
    }

    fn memberships(&self) -> Arc<dyn MembershipRepository> {
        Arc::new(InMemoryMemberships(self.store.clone()))
    }

    async fn create_user_with_default_org(
        &self,
        user: NewUser,
        org: NewOrganisation,
    ) -> AppResult<(User, Organisation)> {
        if self.store.fail_atomic_writes.load(Ordering::SeqCst) {
            return Err(AppError::internal("simulated write failure"));
        }

        let user = self.store.insert_user(user);
        let org = self.store.insert_org(org);
        self.store.link(user.id, org.id);
        Ok((user, org))
    }

    async fn create_organisation_with_owner(
        &self,
        org: NewOrganisation,
        owner_id: Uuid,
    ) -> AppResult<Organisation> {
        if self.store.fail_atomic_writes.load(Ordering::SeqCst) {
            return Err(AppError::internal("simulated write failure"));
        }

        let org = self.store.insert_org(org);
        self.store.link(owner_id, org.id);
        Ok(org)
    }
}

/// Real services wired over the in-memory store.
pub struct TestEnv {
    pub store: Arc<InMemoryStore>,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<Authenticator<InMemoryUow>>,
    pub access: Arc<dyn AccessService>,
    pub resolver: Arc<dyn MembershipResolver>,
}

impl TestEnv {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let uow = InMemoryUow::new(store.clone());
        let tokens = Arc::new(TokenService::new(TEST_SECRET, 3600));
        let resolver: Arc<dyn MembershipResolver> =
            Arc::new(MembershipService::new(uow.clone()));
        let auth = Arc::new(Authenticator::new(uow.clone(), tokens.clone()));
        let access: Arc<dyn AccessService> = Arc::new(Gatekeeper::new(uow, resolver.clone()));

        Self {
            store,
            tokens,
            auth,
            access,
            resolver,
        }
    }

    /// Application state backed by this environment, suitable for
    /// driving the real router in tests.
    pub fn app_state(&self) -> AppState {
        use sea_orm::{DatabaseBackend, MockDatabase};

        let db = Database::from_connection(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        AppState::new(
            self.auth.clone(),
            self.access.clone(),
            self.tokens.clone(),
            Arc::new(db),
        )
    }
}

pub fn registration(first_name: &str, last_name: &str, email: &str) -> Registration {
    Registration {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        password: "C0mpl3xP@ssw0rd".to_string(),
        phone: "1234567890".to_string(),
    }
}

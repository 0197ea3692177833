//! Infrastructure layer - the durable store and its seams.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    MembershipRepository, MembershipStore, OrganisationRepository, OrganisationStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockMembershipRepository, MockOrganisationRepository, MockUserRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockUnitOfWork;

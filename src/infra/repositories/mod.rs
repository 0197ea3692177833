//! Repository layer - data access behind trait seams.

pub(crate) mod entities;
mod membership_repository;
mod organisation_repository;
mod user_repository;

pub use membership_repository::{MembershipRepository, MembershipStore};
pub use organisation_repository::{OrganisationRepository, OrganisationStore};
pub use user_repository::{UserRepository, UserStore};

// Connection-generic writes shared with the transactional path.
pub(crate) use membership_repository::insert_membership;
pub(crate) use organisation_repository::insert_organisation;
pub(crate) use user_repository::insert_user;

// Mocks for unit and integration tests.
#[cfg(any(test, feature = "test-utils"))]
pub use membership_repository::MockMembershipRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use organisation_repository::MockOrganisationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

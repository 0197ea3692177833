//! Domain entities and value objects, free of infrastructure concerns.

pub mod organisation;
pub mod password;
pub mod user;

pub use organisation::{NewOrganisation, Organisation, OrganisationResponse};
pub use password::Password;
pub use user::{NewUser, Registration, User, UserResponse};

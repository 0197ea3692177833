//! SeaORM table models, kept separate from the domain entities.

pub mod membership;
pub mod organisation;
pub mod user;

//! Organisation domain entity and related types.
//!
//! An organisation is the unit of data isolation: users only see other
//! users they share at least one organisation with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Organisation domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organisation {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Data required to persist a new organisation.
#[derive(Debug, Clone)]
pub struct NewOrganisation {
    pub name: String,
    pub description: String,
}

impl NewOrganisation {
    /// The default organisation every new user receives at registration.
    pub fn default_for(first_name: &str, last_name: &str) -> Self {
        Self {
            name: format!("{}'s Organisation", first_name),
            description: format!("Default organisation for {} {}", first_name, last_name),
        }
    }
}

/// Organisation response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrganisationResponse {
    /// Unique organisation identifier
    #[schema(example = "018f2f4e-1b2a-7c3d-9e4f-5a6b7c8d9e0f")]
    pub id: Uuid,
    /// Organisation display name
    #[schema(example = "Acme Corp")]
    pub name: String,
    /// Free-form description
    #[schema(example = "Acme's engineering organisation")]
    pub description: String,
}

impl From<Organisation> for OrganisationResponse {
    fn from(org: Organisation) -> Self {
        Self {
            id: org.id,
            name: org.name,
            description: org.description,
        }
    }
}

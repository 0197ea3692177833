//! Shared types used across the API layer.

mod response;

pub use response::{ApiResponse, Created};

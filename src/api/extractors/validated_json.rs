//! JSON extractor that validates after deserializing.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::{AppError, FieldError};

/// `Json<T>` plus schema validation in one extractor.
///
/// A body that fails to deserialize is a `BadRequest`; a body that
/// deserializes but breaks a validation rule becomes a `Validation`
/// error carrying one `FieldError` per offending field.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        match payload.validate() {
            Ok(()) => Ok(ValidatedJson(payload)),
            Err(errors) => Err(AppError::validation(flatten(&errors))),
        }
    }
}

fn flatten(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut fields = Vec::new();
    for (field, failures) in errors.field_errors() {
        for failure in failures {
            let message = match &failure.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            };
            fields.push(FieldError::new(field.to_string(), message));
        }
    }
    fields
}

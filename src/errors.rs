use rocket::Request;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder, Response};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database not available")]
    ServiceUnavailable(#[from] StoreError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Only {available} seats available")]
    CapacityExceeded { available: u32 },
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::ServiceUnavailable(_) => Status::ServiceUnavailable,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::CapacityExceeded { .. } => Status::BadRequest,
            ApiError::Validation(_) => Status::UnprocessableEntity,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();

        if let ApiError::ServiceUnavailable(source) = &self {
            tracing::error!(uri = %request.uri(), error = %source, "document store failure");
        }

        let body = json!({
            "error": self.to_string(),
            "status": status.code
        })
        .to_string();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), std::io::Cursor::new(body))
            .ok()
    }
}

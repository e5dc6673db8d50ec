use actix_web::body::BoxBody;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("The {entity} with ID: {id} was not found.")]
    NotFound { entity: &'static str, id: i32 },
    #[error("One or more fields failed validation.")]
    Validation(Vec<String>),
    #[error("An unspecified internal error ocurred: {0}")]
    InternalError(#[from] anyhow::Error),
    #[error("An unspecified internal error ocurred")]
    DatabaseError(#[from] BlockingError),
}

impl ApiError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        ApiError::NotFound { entity, id }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            ApiError::Validation(errors) => HttpResponse::BadRequest().json(errors),
            _ => HttpResponse::build(self.status_code()).body(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[test]
    fn not_found_names_the_id() {
        let err = ApiError::not_found("movie", 42);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "The movie with ID: 42 was not found.");
    }

    #[actix_web::test]
    async fn not_found_body_is_the_plain_message() {
        let err = ApiError::not_found("cinema", 7);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], b"The cinema with ID: 7 was not found.");
    }

    #[actix_web::test]
    async fn validation_body_is_a_json_list() {
        let err = ApiError::Validation(vec![
            "Property: duration, Error: The duration must be between 70 and 600 minutes.".to_string(),
        ]);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let parsed: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].contains("duration"));
    }

    #[test]
    fn internal_errors_map_to_500() {
        let err = ApiError::from(anyhow::anyhow!("boom"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

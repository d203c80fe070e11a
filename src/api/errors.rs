use super::responses;
use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};

/// Request errors surfaced to API callers as the JSON failure envelope
#[derive(Debug, Display, Error)]
pub enum ApiError {
    MissingFields(#[error(not(source))] String),
    InvalidPhoneNumber,
    UnsupportedMediaType(#[error(not(source))] String),
    VerificationFailed,
    RouteNotFound,
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            ApiError::MissingFields(fields) => {
                format!("Missing required fields: {fields}")
            }
            ApiError::InvalidPhoneNumber => {
                "Invalid phone number format. Use international format (e.g., 14155551234)"
                    .to_string()
            }
            ApiError::UnsupportedMediaType(kind) => {
                format!("Invalid media type '{kind}'. Must be one of: image, video, document, audio")
            }
            ApiError::VerificationFailed => "Verification failed".to_string(),
            ApiError::RouteNotFound => "Resource not found".to_string(),
        }
    }
}

impl web::error::WebResponseError for ApiError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{:#?}", self);

        web::HttpResponse::build(self.status_code()).json(&responses::error_response(
            &self.message(),
            self.status_code().as_u16(),
        ))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            ApiError::MissingFields(_)
            | ApiError::InvalidPhoneNumber
            | ApiError::UnsupportedMediaType(_) => http::StatusCode::BAD_REQUEST,
            ApiError::VerificationFailed => http::StatusCode::FORBIDDEN,
            ApiError::RouteNotFound => http::StatusCode::NOT_FOUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntex::web::error::WebResponseError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingFields("to".into()).status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::VerificationFailed.status_code(),
            http::StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::RouteNotFound.status_code(),
            http::StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_missing_fields_message_lists_names() {
        assert_eq!(
            ApiError::MissingFields("to, message".into()).message(),
            "Missing required fields: to, message"
        );
    }
}

//! Response envelopes shared by every send endpoint

use serde::Serialize;

/// Success envelope: `{success: true, message, data}`
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

/// Failure envelope: `{success: false, error, statusCode}`
#[derive(Debug, Serialize)]
pub struct ApiFailure {
    pub success: bool,
    pub error: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

pub fn success_response<T: Serialize>(data: T, message: &str) -> ApiSuccess<T> {
    ApiSuccess {
        success: true,
        message: message.to_string(),
        data,
    }
}

pub fn error_response(error: &str, status_code: u16) -> ApiFailure {
    ApiFailure {
        success: false,
        error: error.to_string(),
        status_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(success_response(
            serde_json::json!({"messageId": "wamid.1"}),
            "Message sent successfully",
        ))
        .unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Message sent successfully");
        assert_eq!(json["data"]["messageId"], "wamid.1");
    }

    #[test]
    fn test_failure_envelope_shape() {
        let json = serde_json::to_value(error_response("Invalid phone number format", 400)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid phone number format");
        assert_eq!(json["statusCode"], 400);
    }
}

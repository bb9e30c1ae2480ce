/*
[INPUT]:  Supabase REST and Storage response bodies
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - response-side types
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Error body returned by PostgREST and Storage.
///
/// PostgREST sends `message`/`details`/`hint`; Storage sends
/// `statusCode`/`error`/`message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> Option<String> {
        let message = self.message.or(self.error)?;
        Some(match self.details {
            Some(details) if !details.is_empty() => format!("{message} ({details})"),
            _ => message,
        })
    }
}

/// Storage upload acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Full object path, `bucket/key`
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_body() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#,
        )
        .expect("parse storage error");
        assert_eq!(
            body.into_message().as_deref(),
            Some("The resource already exists")
        );
    }

    #[test]
    fn test_postgrest_error_body_with_details() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"code":"23502","details":"Failing row contains (...)","hint":null,"message":"null value in column"}"#,
        )
        .expect("parse postgrest error");
        assert_eq!(
            body.into_message().as_deref(),
            Some("null value in column (Failing row contains (...))")
        );
    }

    #[test]
    fn test_upload_response() {
        let response: UploadResponse =
            serde_json::from_str(r#"{"Key":"artist-photos/1_me.png","Id":"abc"}"#)
                .expect("parse upload response");
        assert_eq!(response.key, "artist-photos/1_me.png");
        assert_eq!(response.id.as_deref(), Some("abc"));
    }
}

//! Request extractors

use std::collections::HashMap;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use shared::error::AppError;
use validator::{Validate, ValidationErrors};

/// JSON body that has passed its `validator` rules
///
/// Malformed JSON and rule violations are both rejected as validation
/// failures; rule violations list the offending fields in `details`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes = errs.iter().map(|e| e.code.to_string()).collect();
            (field.to_string(), codes)
        })
        .collect();
    fields.sort();

    let names: Vec<&str> = fields.iter().map(|(f, _)| f.as_str()).collect();
    let message = format!("Invalid fields: {}", names.join(", "));

    let details: HashMap<String, Vec<String>> = fields.into_iter().collect();
    AppError::validation(message).with_detail("fields", serde_json::json!(details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use shared::error::ErrorCode;

    #[derive(Debug, serde::Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 4))]
        name: String,
    }

    fn request(body: &str) -> Request {
        http::Request::builder()
            .method("POST")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let body = r#"{"name":"Engineering"}"#;
        let ValidatedJson(p) = ValidatedJson::<Payload>::from_request(request(body), &())
            .await
            .unwrap();
        assert_eq!(p.name, "Engineering");
    }

    #[tokio::test]
    async fn test_rule_violation_lists_field() {
        let err = ValidatedJson::<Payload>::from_request(request(r#"{"name":"ab"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("name"));
        assert!(err.details.unwrap().contains_key("fields"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_failure() {
        let err = ValidatedJson::<Payload>::from_request(request("{not json"), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}

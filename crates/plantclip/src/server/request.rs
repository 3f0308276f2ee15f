//! Classify request bodies.
//!
//! Callers send either JSON or form fields, so the extractor dispatches on
//! `Content-Type` and folds every encoding into one [`ClassifyRequest`].

use axum::{
    body::Bytes,
    extract::{Form, FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Deserialize;

use super::error::ApiError;

/// Body accepted by `/classify` and `/classify/zero-shot`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifyRequest {
    pub image_path: Option<String>,
    /// Zero-shot label subset; ignored by `/classify`
    pub prompts: Option<Vec<String>>,
}

impl ClassifyRequest {
    /// Build a request from decoded form fields. `prompts` may repeat.
    fn from_fields(fields: Vec<(String, String)>) -> Self {
        let mut request = Self::default();
        for (name, value) in fields {
            match name.as_str() {
                "image_path" => request.image_path = Some(value),
                "prompts" => request.prompts.get_or_insert_with(Vec::new).push(value),
                _ => {}
            }
        }
        request
    }

    pub fn image_path(&self) -> &str {
        self.image_path.as_deref().unwrap_or_default()
    }
}

impl<S> FromRequest<S> for ClassifyRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(body) = Json::<ClassifyRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(body)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self::from_fields(fields))
        } else if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;

            let mut fields = Vec::new();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?
            {
                let name = field.name().unwrap_or_default().to_string();
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                fields.push((name, value));
            }
            Ok(Self::from_fields(fields))
        } else {
            // No declared type: an empty body is a request without fields,
            // anything else must be JSON.
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Self::default());
            }
            serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_collects_repeated_prompts() {
        let request = ClassifyRequest::from_fields(vec![
            ("image_path".into(), "/tmp/a.jpg".into()),
            ("prompts".into(), "Orchid".into()),
            ("prompts".into(), "Tulip".into()),
            ("unrelated".into(), "x".into()),
        ]);
        assert_eq!(request.image_path(), "/tmp/a.jpg");
        assert_eq!(
            request.prompts,
            Some(vec!["Orchid".to_string(), "Tulip".to_string()])
        );
    }

    #[test]
    fn test_from_fields_without_prompts() {
        let request = ClassifyRequest::from_fields(vec![]);
        assert_eq!(request.image_path(), "");
        assert_eq!(request.prompts, None);
    }
}

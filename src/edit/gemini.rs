//! Gemini (Google) image edit requestor.

use crate::edit::editor::ImageEditor;
use crate::edit::types::{EditRequest, EditedImage};
use crate::error::{EditError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Model identifier every edit request targets.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash-image";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Builder for GeminiEditor.
#[derive(Debug, Clone, Default)]
pub struct GeminiEditorBuilder {
    api_key: Option<String>,
}

impl GeminiEditorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GEMINI_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the editor, resolving the API key.
    pub fn build(self) -> Result<GeminiEditor> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .ok_or_else(|| {
                EditError::Auth("GEMINI_API_KEY not set and no API key provided".into())
            })?;

        Ok(GeminiEditor {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

/// Sends an image and a text instruction to Gemini and extracts the edited
/// version from the reply.
pub struct GeminiEditor {
    client: reqwest::Client,
    api_key: String,
}

impl GeminiEditor {
    /// Creates a new `GeminiEditorBuilder`.
    pub fn builder() -> GeminiEditorBuilder {
        GeminiEditorBuilder::new()
    }

    async fn edit_impl(&self, request: &EditRequest) -> Result<EditedImage> {
        let url = format!("{}/{}:generateContent", API_BASE, GEMINI_MODEL);
        let body = GeminiRequest::from_edit_request(request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status.as_u16(), &text));
        }

        let reply: GeminiResponse = response.json().await?;
        extract_image(reply, &request.prompt)
    }
}

#[async_trait]
impl ImageEditor for GeminiEditor {
    async fn edit(&self, request: &EditRequest) -> Result<EditedImage> {
        self.edit_impl(request).await.map_err(|e| {
            tracing::error!(error = %e, "Gemini edit request failed");
            e
        })
    }

    async fn health_check(&self) -> Result<()> {
        let url = format!("{}/{}", API_BASE, GEMINI_MODEL);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            401 | 403 => Err(EditError::Auth("Invalid API key".into())),
            404 => Err(EditError::Service(
                "Model not found. Verify the model name is correct.".into(),
            )),
            s if !(200..300).contains(&s) => Err(EditError::Api {
                status: s,
                message: "Health check failed".into(),
            }),
            _ => Ok(()),
        }
    }
}

fn parse_http_error(status: u16, text: &str) -> EditError {
    if status == 401 || status == 403 {
        return EditError::Auth(text.to_string());
    }
    EditError::Api {
        status,
        message: text.to_string(),
    }
}

/// Applies the reply-extraction policy, first match wins:
/// a reply without content parts fails outright; the first part carrying
/// inline image data becomes the result; failing that, a text part is
/// surfaced verbatim as a refusal; failing that, the reply is unusable.
fn extract_image(reply: GeminiResponse, prompt: &str) -> Result<EditedImage> {
    let parts = reply
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .filter(|parts| !parts.is_empty());

    let Some(parts) = parts else {
        return Err(EditError::Service("No content returned from Gemini.".into()));
    };

    for part in &parts {
        if let Some(inline) = &part.inline_data {
            if !inline.data.is_empty() {
                let media_type = inline.mime_type.as_deref().unwrap_or("image/png");
                return Ok(EditedImage::from_payload(media_type, &inline.data, prompt));
            }
        }
    }

    if let Some(text) = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .find(|t| !t.is_empty())
    {
        return Err(EditError::Refusal(format!(
            "Model returned text instead of image: {text}"
        )));
    }

    Err(EditError::Service(
        "The model did not return a valid image.".into(),
    ))
}

// Request/Response types
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text { text: String },
    InlineData { inline_data: GeminiInlineData },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

impl GeminiRequest {
    fn from_edit_request(req: &EditRequest) -> Self {
        // Prompt first, then the inline image it applies to.
        let parts = vec![
            GeminiRequestPart::Text {
                text: req.prompt.clone(),
            },
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: req.media_type.clone(),
                    data: req.encoded_data.clone(),
                },
            },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiReplyPart {
    #[serde(default)]
    inline_data: Option<InlineData>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_from_json(json: &str) -> GeminiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_builder_with_explicit_key() {
        let editor = GeminiEditorBuilder::new().api_key("test-key").build();
        assert!(editor.is_ok());
    }

    #[test]
    fn test_request_construction_order() {
        let req = EditRequest::new("Turn this into a pencil sketch", "Zm9v", "image/jpeg");
        let body = GeminiRequest::from_edit_request(&req);

        assert_eq!(body.contents.len(), 1);
        let parts = &body.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], GeminiRequestPart::Text { text } if text == &req.prompt));
        assert!(matches!(&parts[1], GeminiRequestPart::InlineData { .. }));
    }

    #[test]
    fn test_request_serialization_uses_camel_case_mime_type() {
        let req = EditRequest::new("p", "Zm9v", "image/png");
        let body = GeminiRequest::from_edit_request(&req);
        let json = serde_json::to_value(&body).unwrap();

        let inline = &json["contents"][0]["parts"][1]["inline_data"];
        assert_eq!(inline["mimeType"], "image/png");
        assert_eq!(inline["data"], "Zm9v");
    }

    #[test]
    fn test_extract_first_inline_image_wins() {
        let reply = reply_from_json(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            {"inlineData": {"mimeType": "image/png", "data": "Zm9v"}},
                            {"inlineData": {"mimeType": "image/jpeg", "data": "YmFy"}}
                        ]
                    }
                }]
            }"#,
        );
        let image = extract_image(reply, "p").unwrap();
        assert_eq!(image.data_url, "data:image/png;base64,Zm9v");
    }

    #[test]
    fn test_extract_defaults_missing_mime_to_png() {
        let reply = reply_from_json(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"inlineData": {"data": "Zm9v"}}]}
                }]
            }"#,
        );
        let image = extract_image(reply, "p").unwrap();
        assert_eq!(image.data_url, "data:image/png;base64,Zm9v");
    }

    #[test]
    fn test_extract_image_after_leading_text_part() {
        let reply = reply_from_json(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            {"text": "Here you go"},
                            {"inlineData": {"mimeType": "image/png", "data": "Zm9v"}}
                        ]
                    }
                }]
            }"#,
        );
        let image = extract_image(reply, "p").unwrap();
        assert_eq!(image.data_url, "data:image/png;base64,Zm9v");
    }

    #[test]
    fn test_extract_text_only_surfaces_refusal_verbatim() {
        let reply = reply_from_json(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "no"}]}
                }]
            }"#,
        );
        let err = extract_image(reply, "p").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model returned text instead of image: no"
        );
    }

    #[test]
    fn test_extract_no_candidates() {
        let err = extract_image(reply_from_json(r#"{"candidates": []}"#), "p").unwrap_err();
        assert_eq!(err.to_string(), "No content returned from Gemini.");
    }

    #[test]
    fn test_extract_empty_parts_list() {
        let reply = reply_from_json(r#"{"candidates": [{"content": {"parts": []}}]}"#);
        let err = extract_image(reply, "p").unwrap_err();
        assert_eq!(err.to_string(), "No content returned from Gemini.");
    }

    #[test]
    fn test_extract_parts_without_image_or_text() {
        let reply = reply_from_json(r#"{"candidates": [{"content": {"parts": [{}]}}]}"#);
        let err = extract_image(reply, "p").unwrap_err();
        assert_eq!(err.to_string(), "The model did not return a valid image.");
    }

    #[test]
    fn test_extract_skips_empty_inline_data() {
        let reply = reply_from_json(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            {"inlineData": {"mimeType": "image/png", "data": ""}},
                            {"text": "could not comply"}
                        ]
                    }
                }]
            }"#,
        );
        let err = extract_image(reply, "p").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model returned text instead of image: could not comply"
        );
    }

    #[test]
    fn test_parse_http_error_auth() {
        assert!(matches!(parse_http_error(401, "bad key"), EditError::Auth(_)));
        assert!(matches!(parse_http_error(403, "denied"), EditError::Auth(_)));

        let err = parse_http_error(500, "boom");
        assert!(matches!(err, EditError::Api { status: 500, .. }));
    }
}

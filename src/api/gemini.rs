//! HTTP client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use tracing::debug;

use super::client::{ApiError, Citation, ModelClient, ModelReply, ModelRequest};
use super::{Content, GenerateContentRequest, GenerateContentResponse, Tool};

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("groundchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            http,
            api_key: api_key.trim().to_string(),
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ApiError> {
        let url = self.endpoint(&request.model);
        let body = build_request(request);
        debug!(
            model = %request.model,
            history_len = request.history.len(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ApiError::Status { status, body });
        }

        let text = response.text().await.map_err(ApiError::Transport)?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(ApiError::Decode)?;
        parse_reply(parsed)
    }
}

pub(crate) fn build_request(request: &ModelRequest) -> GenerateContentRequest {
    let contents = request
        .history
        .iter()
        .map(|entry| Content::text(Some(entry.role.as_str()), entry.text()))
        .collect();

    GenerateContentRequest {
        contents,
        system_instruction: Content::text(None, request.system_instruction.clone()),
        tools: if request.grounding {
            vec![Tool::google_search()]
        } else {
            Vec::new()
        },
    }
}

/// Pull the reply text and grounding citations out of the first candidate.
pub(crate) fn parse_reply(response: GenerateContentResponse) -> Result<ModelReply, ApiError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::MalformedResponse("response contained no candidates".into()))?;

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if texts.is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "unknown".to_string());
        return Err(ApiError::MalformedResponse(format!(
            "candidate had no text (finish reason: {reason})"
        )));
    }

    let citations = candidate
        .grounding_metadata
        .map(|metadata| metadata.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .map(|chunk| match chunk.web {
            Some(web) => Citation {
                uri: web.uri,
                title: web.title,
            },
            None => Citation::default(),
        })
        .collect();

    Ok(ModelReply {
        text: texts.concat(),
        citations,
    })
}

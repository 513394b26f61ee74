use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Parameters for one chat completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the model for a JSON object instead of free text.
    pub json_object: bool,
}

/// A language model that turns messages into a reply.
///
/// `Ok(None)` means the model answered without any content.
pub trait Completer: Send + Sync {
    fn complete(&self, req: CompletionRequest) -> BoxFuture<'_, Result<Option<String>>>;
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    #[instrument(level = "debug", skip(self, req), fields(model = %self.model, messages = req.messages.len()))]
    async fn call(&self, req: CompletionRequest) -> Result<Option<String>> {
        let body = ApiRequest {
            model: &self.model,
            messages: &req.messages,
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            response_format: req.json_object.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let url = self.endpoint();
        let resp: ApiResponse = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .json()
            .await
            .context("decoding completion response")?;

        let content = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        debug!(has_content = content.is_some(), "completion finished");
        Ok(content)
    }
}

impl Completer for OpenAiClient {
    fn complete(&self, req: CompletionRequest) -> BoxFuture<'_, Result<Option<String>>> {
        Box::pin(self.call(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let a = OpenAiClient::new(Client::new(), "https://api.openai.com/v1/", "k", "m");
        let b = OpenAiClient::new(Client::new(), "https://api.openai.com/v1", "k", "m");
        assert_eq!(a.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(a.endpoint(), b.endpoint());
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let body = ApiRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: None,
            max_tokens: Some(50),
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "hi" }
                ],
                "max_tokens": 50,
                "response_format": { "type": "json_object" }
            })
        );
    }

    #[test]
    fn test_response_without_choices() {
        let resp: ApiResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(resp.choices.is_empty());

        let resp: ApiResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
                .unwrap();
        assert!(resp.choices[0].message.content.is_none());
    }
}

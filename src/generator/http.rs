//! OpenAI互換 Chat Completions API による生成

use super::{GenerationRequest, ProcessMapGenerator};
use crate::error::{ProcessMapError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

const SYSTEM_PROMPT: &str =
    "You are an ISO 9001 quality management consultant. Respond with JSON only.";

pub struct HttpGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpGenerator {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// `{base}/chat/completions`
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// リクエストボディ
pub fn request_body(request: &GenerationRequest) -> Value {
    json!({
        "model": request.model,
        "temperature": request.temperature,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": request.prompt }
        ]
    })
}

/// `choices[0].message.content` を取り出す
pub fn extract_message_content(payload: &Value) -> Result<String> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| ProcessMapError::Generator("response text missing".into()))
}

#[async_trait]
impl ProcessMapGenerator for HttpGenerator {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = request_body(request);
        debug!("POST {} (prompt {} chars)", self.endpoint(), request.prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProcessMapError::Generator(format!(
                "API failed with status {}: {}",
                status, text
            )));
        }

        let payload: Value = response.json().await?;
        extract_message_content(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_slash() {
        let generator = HttpGenerator::new("http://localhost:8080/v1/", "key").unwrap();
        assert_eq!(generator.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_request_body() {
        let request = GenerationRequest::new("Retail", vec![], "gpt-test", None).with_temperature(0.5);
        let body = request_body(&request);
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], request.prompt.as_str());
    }

    #[test]
    fn test_extract_message_content() {
        let payload = json!({
            "choices": [ { "message": { "role": "assistant", "content": "{\"processes\": []}" } } ]
        });
        assert_eq!(extract_message_content(&payload).unwrap(), "{\"processes\": []}");
        assert!(extract_message_content(&json!({"choices": []})).is_err());
    }
}

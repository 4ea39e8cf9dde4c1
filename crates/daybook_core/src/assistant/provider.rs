//! Hosted chat-completion providers and the HTTP transport they share.
//!
//! # Responsibility
//! - Shape one role-tagged prompt into each provider's request body.
//! - Extract the reply text from each provider's response payload.
//! - Send requests through [`ChatTransport`] so tests can script responses.
//!
//! # Invariants
//! - API keys never appear in log lines or error messages.
//! - An empty or whitespace-only reply counts as a failed attempt.

use log::error;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_MODELS: &[&str] = &["gemini-2.0-flash", "gemini-1.5-flash", "gemini-1.5-pro"];
pub const DEFAULT_OPENAI_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-3.5-turbo"];

const TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 1024;
const ERROR_BODY_MAX_CHARS: usize = 200;

/// Failure of one HTTP round trip.
#[derive(Debug)]
pub enum TransportError {
    /// Connection, TLS, or timeout failure before a status was received.
    Network(String),
    /// Server answered with a non-success status.
    Status { status: u16, body: String },
    /// Response body was not valid JSON.
    Decode(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "network error: {message}"),
            Self::Status { status, body } => write!(f, "http status {status}: {body}"),
            Self::Decode(message) => write!(f, "invalid json response: {message}"),
        }
    }
}

impl Error for TransportError {}

/// Failure of one provider/model attempt.
#[derive(Debug)]
pub enum ProviderError {
    Transport(TransportError),
    /// Payload parsed but held no usable reply text.
    EmptyReply,
}

impl ProviderError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(TransportError::Network(_)) => "network",
            Self::Transport(TransportError::Status { .. }) => "http_status",
            Self::Transport(TransportError::Decode(_)) => "decode",
            Self::EmptyReply => "empty_reply",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "{err}"),
            Self::EmptyReply => write!(f, "provider returned no reply text"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::EmptyReply => None,
        }
    }
}

impl From<TransportError> for ProviderError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

/// Blocking JSON POST seam.
pub trait ChatTransport {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        body: &Value,
    ) -> Result<Value, TransportError>;
}

/// [`ChatTransport`] over a blocking `reqwest` client.
///
/// When the client cannot be built every request fails with
/// [`TransportError::Network`] instead of panicking.
pub struct HttpTransport {
    client: Result<reqwest::blocking::Client, String>,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        match reqwest::blocking::Client::builder().timeout(timeout).build() {
            Ok(client) => Self { client: Ok(client) },
            Err(err) => {
                let reason = describe_reqwest_error(err);
                error!(
                    "event=http_client_build module=assistant status=error error_code=client_unavailable error={reason}"
                );
                Self::unavailable(reason)
            }
        }
    }

    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            client: Err(reason.into()),
        }
    }
}

impl ChatTransport for HttpTransport {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        body: &Value,
    ) -> Result<Value, TransportError> {
        let client = self
            .client
            .as_ref()
            .map_err(|reason| TransportError::Network(format!("http client unavailable: {reason}")))?;
        let mut request = client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        // reqwest errors can embed the request url, which carries the Gemini key.
        let response = request
            .send()
            .map_err(|err| TransportError::Network(describe_reqwest_error(err)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_MAX_CHARS).collect(),
            });
        }

        response
            .json::<Value>()
            .map_err(|err| TransportError::Decode(describe_reqwest_error(err)))
    }
}

fn describe_reqwest_error(err: reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "connection failed".to_string()
    } else {
        err.without_url().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    /// Stable id used in storage keys and log lines.
    pub fn id(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTurn {
    pub role: Role,
    pub content: String,
}

impl PromptTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// System instructions plus the conversation turns, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub turns: Vec<PromptTurn>,
}

/// One outbound HTTP request ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

/// A configured hosted provider with its ordered model list.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: String,
    pub models: Vec<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .finish()
    }
}

impl ProviderConfig {
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Gemini,
            api_key: api_key.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            models: DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            models: DEFAULT_OPENAI_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        if !models.is_empty() {
            self.models = models;
        }
        self
    }

    pub fn build_request(&self, model: &str, prompt: &ChatPrompt) -> ProviderRequest {
        let base = self.base_url.trim_end_matches('/');
        match self.kind {
            ProviderKind::Gemini => ProviderRequest {
                url: format!("{base}/models/{model}:generateContent?key={}", self.api_key),
                headers: Vec::new(),
                body: gemini_body(prompt),
            },
            ProviderKind::OpenAi => ProviderRequest {
                url: format!("{base}/chat/completions"),
                headers: vec![("Authorization", format!("Bearer {}", self.api_key))],
                body: openai_body(model, prompt),
            },
        }
    }

    pub fn parse_reply(&self, payload: &Value) -> Option<String> {
        let pointer = match self.kind {
            ProviderKind::Gemini => "/candidates/0/content/parts/0/text",
            ProviderKind::OpenAi => "/choices/0/message/content",
        };
        payload
            .pointer(pointer)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    /// Runs one attempt against `model`.
    pub fn complete(
        &self,
        transport: &dyn ChatTransport,
        model: &str,
        prompt: &ChatPrompt,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(model, prompt);
        let payload = transport.post_json(&request.url, &request.headers, &request.body)?;
        self.parse_reply(&payload).ok_or(ProviderError::EmptyReply)
    }
}

fn gemini_body(prompt: &ChatPrompt) -> Value {
    let contents: Vec<Value> = prompt
        .turns
        .iter()
        .filter(|turn| turn.role != Role::System)
        .map(|turn| {
            let role = match turn.role {
                Role::Assistant => "model",
                _ => "user",
            };
            json!({ "role": role, "parts": [{ "text": turn.content }] })
        })
        .collect();

    json!({
        "systemInstruction": { "parts": [{ "text": prompt.system }] },
        "contents": contents,
        "generationConfig": {
            "temperature": TEMPERATURE,
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
        },
    })
}

fn openai_body(model: &str, prompt: &ChatPrompt) -> Value {
    let mut messages = vec![json!({ "role": "system", "content": prompt.system })];
    messages.extend(prompt.turns.iter().map(|turn| {
        let role = match turn.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        json!({ "role": role, "content": turn.content })
    }));

    json!({
        "model": model,
        "messages": messages,
        "temperature": TEMPERATURE,
        "max_tokens": MAX_OUTPUT_TOKENS,
    })
}

#[cfg(test)]
mod tests {
    use super::{ChatPrompt, ChatTransport, HttpTransport, PromptTurn, ProviderConfig, Role, TransportError};
    use serde_json::json;

    fn prompt() -> ChatPrompt {
        ChatPrompt {
            system: "be brief".to_string(),
            turns: vec![
                PromptTurn::new(Role::User, "hi"),
                PromptTurn::new(Role::Assistant, "hello"),
                PromptTurn::new(Role::User, "what is sql"),
            ],
        }
    }

    #[test]
    fn gemini_request_shape() {
        let provider = ProviderConfig::gemini("k1");
        let request = provider.build_request("gemini-1.5-flash", &prompt());
        assert_eq!(
            request.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=k1"
        );
        assert!(request.headers.is_empty());
        assert_eq!(request.body["contents"][1]["role"], "model");
        assert_eq!(request.body["contents"][2]["parts"][0]["text"], "what is sql");
        assert_eq!(request.body["systemInstruction"]["parts"][0]["text"], "be brief");
    }

    #[test]
    fn openai_request_shape() {
        let provider = ProviderConfig::openai("k2").with_base_url("http://localhost:8080/v1/");
        let request = provider.build_request("gpt-4o-mini", &prompt());
        assert_eq!(request.url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(request.headers, vec![("Authorization", "Bearer k2".to_string())]);
        assert_eq!(request.body["model"], "gpt-4o-mini");
        assert_eq!(request.body["messages"][0]["role"], "system");
        assert_eq!(request.body["messages"][3]["content"], "what is sql");
    }

    #[test]
    fn reply_extraction_per_provider() {
        let gemini = ProviderConfig::gemini("k");
        let openai = ProviderConfig::openai("k");
        let gemini_payload = json!({"candidates": [{"content": {"parts": [{"text": " ok "}]}}]});
        let openai_payload = json!({"choices": [{"message": {"content": "fine"}}]});

        assert_eq!(gemini.parse_reply(&gemini_payload).as_deref(), Some("ok"));
        assert_eq!(openai.parse_reply(&openai_payload).as_deref(), Some("fine"));
        assert_eq!(gemini.parse_reply(&openai_payload), None);
        assert_eq!(openai.parse_reply(&json!({"choices": [{"message": {"content": "  "}}]})), None);
    }

    #[test]
    fn debug_output_redacts_key() {
        let rendered = format!("{:?}", ProviderConfig::openai("secret-key"));
        assert!(!rendered.contains("secret-key"));
    }

    #[test]
    fn unavailable_client_fails_every_request() {
        let transport = HttpTransport::unavailable("no tls backend");
        let result = transport.post_json("https://example.invalid/v1", &[], &json!({}));
        match result {
            Err(TransportError::Network(message)) => assert!(message.contains("no tls backend")),
            other => panic!("expected network error, got {other:?}"),
        }
    }
}

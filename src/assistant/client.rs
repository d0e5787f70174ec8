//! Chat-completions client
//!
//! `ChatClient` is the seam between turn orchestration and the hosted
//! model; `OpenAiClient` is the HTTP implementation.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use super::config::{ApiKey, AssistantConfig};
use super::conversation::{ChatTurn, Role};
use super::error::AssistantError;
use super::tools::ToolDefinition;

/// Role of a wire message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// Function invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments, as a string
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

/// A chat-completions message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// Some compatible providers send `"tool_calls": null` on plain replies
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ToolCall>, D::Error> {
    Ok(Option::<Vec<ToolCall>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatMessage {
    fn text(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(MessageRole::Assistant, content)
    }

    /// Assistant message carrying a single function invocation
    pub fn assistant_tool_call(call: ToolCall) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: None,
            tool_calls: vec![call],
            tool_call_id: None,
        }
    }

    /// Result of a function invocation
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Non-empty text content
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

impl From<&ChatTurn> for ChatMessage {
    fn from(turn: &ChatTurn) -> Self {
        match turn.role {
            Role::User => ChatMessage::user(turn.content.clone()),
            Role::Assistant => ChatMessage::assistant(turn.content.clone()),
        }
    }
}

/// One request to the model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    /// Declared tools; empty means plain completion
    pub tools: Vec<ToolDefinition>,
}

/// Anything that can complete a chat request
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a request and return the assistant message of the first choice
    async fn complete(&self, credential: &ApiKey, request: &ChatRequest) -> Result<ChatMessage, AssistantError>;

    /// Model name for logging
    fn model_name(&self) -> &str;
}

/// Request body for `/chat/completions`
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

/// OpenAI-compatible HTTP client
#[derive(Clone)]
pub struct OpenAiClient {
    config: AssistantConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Client configured from `OPENAI_MODEL` / `OPENAI_API_BASE`
    pub fn from_env() -> Self {
        Self::new(AssistantConfig::from_env())
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    fn request_body<'a>(&'a self, request: &'a ChatRequest) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.config.model,
            messages: &request.messages,
            tools: &request.tools,
            tool_choice: if request.tools.is_empty() { None } else { Some("auto") },
            temperature: self.config.temperature,
        }
    }
}

/// Pull the first choice's message out of a response body
fn parse_response(body: &str) -> Result<ChatMessage, AssistantError> {
    let response: ApiResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| AssistantError::MalformedResponse("response contained no choices".to_string()))
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, credential: &ApiKey, request: &ChatRequest) -> Result<ChatMessage, AssistantError> {
        log::debug!(
            "Sending {} messages to {} ({} tools)",
            request.messages.len(),
            self.config.model,
            request.tools.len()
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(credential.expose())
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }

        log::debug!("Model response: {}", body.chars().take(1000).collect::<String>());
        parse_response(&body)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

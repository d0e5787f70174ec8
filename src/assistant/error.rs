//! Errors surfaced by a conversational turn

use thiserror::Error;

/// Everything that can go wrong during one chat turn
///
/// None of these are fatal; each is scoped to the turn that raised it.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No API key has been supplied for this session
    #[error("Please enter your OpenAI API key to use the chat.")]
    MissingCredential,

    /// Nothing to send
    #[error("Message is empty.")]
    EmptyMessage,

    /// Transport failure talking to the model API
    #[error("request to the language model failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The model API answered with a non-success status
    #[error("language model API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The model API answered with something we cannot use
    #[error("malformed response from the language model: {0}")]
    MalformedResponse(String),
}

impl From<serde_json::Error> for AssistantError {
    fn from(e: serde_json::Error) -> Self {
        AssistantError::MalformedResponse(e.to_string())
    }
}

impl AssistantError {
    /// Whether the turn was rejected before anything was recorded
    pub fn is_precondition(&self) -> bool {
        matches!(self, AssistantError::MissingCredential | AssistantError::EmptyMessage)
    }
}

//! Conversational assistant: a chat model that can drive the calculator
//! through the `update_calculator` function

pub mod client;
pub mod config;
mod conversation;
mod error;
pub mod prompt;
mod session;
pub mod tools;
mod turn;

pub use client::{ChatClient, ChatMessage, ChatRequest, OpenAiClient};
pub use config::{ApiKey, AssistantConfig, DEFAULT_MODEL};
pub use conversation::{ChatTurn, Conversation, Role};
pub use error::AssistantError;
pub use session::{Session, UpdateNotice};
pub use turn::take_turn;

//! One conversational turn against the model

use super::client::{ChatClient, ChatMessage, ChatRequest, ToolCall};
use super::error::AssistantError;
use super::prompt::system_prompt;
use super::session::Session;
use super::tools::{update_calculator_tool, UPDATE_CALCULATOR};
use crate::calculator::CalculatorUpdate;
use crate::projection::ProjectionEngine;

/// Run one user turn: send the message, apply any calculator update the
/// model requests, and return the assistant's reply
///
/// Precondition failures leave the session untouched. Failures after the
/// user message was recorded leave that message in place without a reply;
/// a calculator update applied before a failed follow-up call stays applied.
pub async fn take_turn(
    session: &mut Session,
    client: &dyn ChatClient,
    engine: &ProjectionEngine,
    message: &str,
) -> Result<String, AssistantError> {
    let credential = session.credential().cloned().ok_or(AssistantError::MissingCredential)?;

    let message = message.trim();
    if message.is_empty() {
        return Err(AssistantError::EmptyMessage);
    }

    session.conversation.push_user(message);

    let mut messages = Vec::with_capacity(session.conversation.len() + 1);
    messages.push(ChatMessage::system(system_prompt(&session.state, engine)));
    messages.extend(session.conversation.turns().iter().map(ChatMessage::from));

    let request = ChatRequest {
        messages,
        tools: vec![update_calculator_tool()],
    };

    log::debug!("Turn with {} history messages via {}", session.conversation.len(), client.model_name());
    let reply = client.complete(&credential, &request).await?;

    let text = match reply.tool_calls.first().cloned() {
        Some(call) => {
            let result = handle_tool_call(session, &call);

            let mut messages = request.messages;
            messages.push(ChatMessage::assistant_tool_call(call.clone()));
            messages.push(ChatMessage::tool_result(call.id, result));

            let follow_up = ChatRequest {
                messages,
                tools: Vec::new(),
            };
            let final_reply = client.complete(&credential, &follow_up).await?;
            reply_text(&final_reply)?
        }
        None => reply_text(&reply)?,
    };

    session.conversation.push_assistant(text.clone());
    Ok(text)
}

/// Execute a requested function and return the text fed back to the model
fn handle_tool_call(session: &mut Session, call: &ToolCall) -> String {
    if call.function.name != UPDATE_CALCULATOR {
        log::warn!("Model requested unknown function {}", call.function.name);
        return format!("Unknown function: {}", call.function.name);
    }

    let update = CalculatorUpdate::from_arguments(&call.function.arguments);
    session.apply(&update).summary()
}

fn reply_text(message: &ChatMessage) -> Result<String, AssistantError> {
    message
        .text_content()
        .map(str::to_string)
        .ok_or_else(|| AssistantError::MalformedResponse("assistant reply had no text".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::client::{FunctionCall, MessageRole};
    use crate::assistant::config::ApiKey;
    use crate::assistant::conversation::Role;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted replies and records every request it sees
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<ChatMessage, AssistantError>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<ChatMessage, AssistantError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatClient for ScriptedClient {
        async fn complete(&self, _credential: &ApiKey, request: &ChatRequest) -> Result<ChatMessage, AssistantError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AssistantError::MalformedResponse("script exhausted".to_string())))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn tool_reply(name: &str, arguments: &str) -> ChatMessage {
        ChatMessage {
            role: MessageRole::Assistant,
            content: None,
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                kind: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            }],
            tool_call_id: None,
        }
    }

    fn session_with_key() -> Session {
        let mut session = Session::seeded();
        session.set_credential(ApiKey::new("sk-test"));
        session
    }

    #[tokio::test]
    async fn test_salary_change_through_tool_call() {
        let mut session = session_with_key();
        let client = ScriptedClient::new(vec![
            Ok(tool_reply("update_calculator", r#"{"current_salary": 55000}"#)),
            Ok(ChatMessage::assistant("Done: your salary is now £55,000.")),
        ]);

        let reply = take_turn(&mut session, &client, &ProjectionEngine::default(), "My salary is now 55000")
            .await
            .unwrap();

        assert_eq!(reply, "Done: your salary is now £55,000.");
        assert_eq!(session.state.profile.current_salary, Some(55000.0));
        assert_eq!(session.state.profile.years_of_service, Some(20.0));

        let notice = session.take_notice().unwrap();
        assert_eq!(notice.text, "• Current salary: £40,000 → £55,000");
        assert!(session.take_notice().is_none());

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].tools.len(), 1);
        assert_eq!(requests[0].messages[0].role, MessageRole::System);
        assert!(requests[1].tools.is_empty());

        let tool_result = requests[1].messages.last().unwrap();
        assert_eq!(tool_result.role, MessageRole::Tool);
        assert_eq!(tool_result.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(
            tool_result.content.as_deref(),
            Some("Calculator updated:\n• Current salary: £40,000 → £55,000")
        );

        let turns = session.conversation.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_plain_answer_makes_one_call() {
        let mut session = session_with_key();
        let client = ScriptedClient::new(vec![Ok(ChatMessage::assistant("The 2015 scheme is career average."))]);

        let reply = take_turn(&mut session, &client, &ProjectionEngine::default(), "What is CARE?")
            .await
            .unwrap();

        assert_eq!(reply, "The 2015 scheme is career average.");
        assert_eq!(client.requests().len(), 1);
        assert!(session.take_notice().is_none());
        assert_eq!(session.state, crate::calculator::CalculatorState::seeded());
    }

    #[tokio::test]
    async fn test_missing_credential_changes_nothing() {
        let mut session = Session::seeded();
        let client = ScriptedClient::new(vec![]);

        let err = take_turn(&mut session, &client, &ProjectionEngine::default(), "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, AssistantError::MissingCredential));
        assert!(err.is_precondition());
        assert!(session.conversation.is_empty());
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let mut session = session_with_key();
        let client = ScriptedClient::new(vec![]);

        let err = take_turn(&mut session, &client, &ProjectionEngine::default(), "   ")
            .await
            .unwrap_err();

        assert!(matches!(err, AssistantError::EmptyMessage));
        assert!(session.conversation.is_empty());
    }

    #[tokio::test]
    async fn test_failed_call_keeps_user_turn_only() {
        let mut session = session_with_key();
        let client = ScriptedClient::new(vec![Err(AssistantError::Api {
            status: 401,
            body: "invalid key".to_string(),
        })]);

        let err = take_turn(&mut session, &client, &ProjectionEngine::default(), "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, AssistantError::Api { status: 401, .. }));
        assert_eq!(session.conversation.len(), 1);
        assert_eq!(session.conversation.last().unwrap().role, Role::User);
        assert_eq!(session.state, crate::calculator::CalculatorState::seeded());
    }

    #[tokio::test]
    async fn test_update_survives_failed_follow_up() {
        let mut session = session_with_key();
        let client = ScriptedClient::new(vec![Ok(tool_reply("update_calculator", r#"{"retirement_age": 60}"#))]);

        let result = take_turn(&mut session, &client, &ProjectionEngine::default(), "retire at 60").await;

        assert!(result.is_err());
        assert_eq!(session.state.profile.retirement_age, Some(60));
        assert!(session.was_just_updated());
        assert_eq!(session.conversation.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_arguments_make_no_changes() {
        let mut session = session_with_key();
        let client = ScriptedClient::new(vec![
            Ok(tool_reply("update_calculator", "{not json")),
            Ok(ChatMessage::assistant("Sorry, nothing changed.")),
        ]);

        take_turn(&mut session, &client, &ProjectionEngine::default(), "change something")
            .await
            .unwrap();

        assert_eq!(session.state, crate::calculator::CalculatorState::seeded());
        assert!(session.take_notice().is_none());

        let requests = client.requests();
        let tool_result = requests[1].messages.last().unwrap();
        assert_eq!(tool_result.content.as_deref(), Some("No changes made to the calculator."));
    }

    #[tokio::test]
    async fn test_unknown_function_reported_to_model() {
        let mut session = session_with_key();
        let client = ScriptedClient::new(vec![
            Ok(tool_reply("delete_everything", "{}")),
            Ok(ChatMessage::assistant("I can only update the calculator.")),
        ]);

        let reply = take_turn(&mut session, &client, &ProjectionEngine::default(), "wipe it")
            .await
            .unwrap();

        assert_eq!(reply, "I can only update the calculator.");
        let requests = client.requests();
        let tool_result = requests[1].messages.last().unwrap();
        assert_eq!(tool_result.content.as_deref(), Some("Unknown function: delete_everything"));
        assert_eq!(session.state, crate::calculator::CalculatorState::seeded());
    }

    #[tokio::test]
    async fn test_empty_reply_is_malformed() {
        let mut session = session_with_key();
        let client = ScriptedClient::new(vec![Ok(ChatMessage {
            role: MessageRole::Assistant,
            content: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
        })]);

        let err = take_turn(&mut session, &client, &ProjectionEngine::default(), "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, AssistantError::MalformedResponse(_)));
        assert_eq!(session.conversation.len(), 1);
    }

    #[tokio::test]
    async fn test_history_is_sent_with_system_prompt_first() {
        let mut session = session_with_key();
        let client = ScriptedClient::new(vec![
            Ok(ChatMessage::assistant("first answer")),
            Ok(ChatMessage::assistant("second answer")),
        ]);
        let engine = ProjectionEngine::default();

        take_turn(&mut session, &client, &engine, "first").await.unwrap();
        take_turn(&mut session, &client, &engine, "second").await.unwrap();

        let requests = client.requests();
        let second = &requests[1].messages;
        assert_eq!(second.len(), 4);
        assert_eq!(second[0].role, MessageRole::System);
        assert_eq!(second[1].text_content(), Some("first"));
        assert_eq!(second[2].text_content(), Some("first answer"));
        assert_eq!(second[3].text_content(), Some("second"));
    }
}

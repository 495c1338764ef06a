//! Chat-completion client that remembers a bounded conversation.

pub mod history;

pub use history::ChatHistory;

use crate::config::Config;
use crate::core::error::PxError;
use crate::http::HttpSettings;
use crate::providers::openai::OpenAITransport;
use crate::providers::{ChatCompletionRequest, ChatCompletionResponse, ChatTransport, Message};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub system_msg: Option<String>,
    pub remember_history: bool,
    pub history_exchanges: usize,
}

pub struct ChatApi {
    transport: Box<dyn ChatTransport>,
    settings: ChatSettings,
    history: ChatHistory,
}

impl ChatApi {
    pub fn new(settings: ChatSettings, transport: Box<dyn ChatTransport>) -> Self {
        let history = ChatHistory::new(settings.history_exchanges);
        Self {
            transport,
            settings,
            history,
        }
    }

    /// Build a client against the configured endpoint. The API key comes from
    /// `OPENAI_API_KEY` or the config file and is required.
    pub fn from_config(config: &Config, model: Option<&str>) -> Result<Self, PxError> {
        let api_key = config.api_key().ok_or_else(|| {
            PxError::Config("OpenAI token cannot be None, set OPENAI_API_KEY first".to_string())
        })?;
        let transport = OpenAITransport::new(
            config.chat.url.clone(),
            api_key,
            &HttpSettings::try_from(&config.http)?,
        )?;

        let settings = ChatSettings {
            model: model
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(&config.chat.model)
                .to_string(),
            system_msg: config.chat.system_msg.clone(),
            remember_history: config.chat.remember_history,
            history_exchanges: config.chat.history_exchanges,
        };
        Ok(Self::new(settings, Box::new(transport)))
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn set_model(&mut self, model: &str) {
        self.settings.model = model.to_string();
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Ask a question and return the trimmed answer.
    ///
    /// On success the exchange is added to the history (when enabled); on
    /// failure the history is left untouched.
    pub async fn chat(&mut self, question: &str) -> Result<String, PxError> {
        let request = ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages: self.build_messages(question),
        };
        debug!(model = %request.model, messages = request.messages.len(), "sending chat request");

        let raw = self.transport.send(&request).await.map_err(|e| {
            debug!(error = %e, "chat request failed");
            PxError::Chat(e.to_string())
        })?;

        let response: ChatCompletionResponse = serde_json::from_value(raw)
            .map_err(|e| PxError::Chat(format!("unexpected response shape: {}", e)))?;

        let answer = pick_answer(response)
            .ok_or_else(|| PxError::Chat("no answer choices".to_string()))?;
        let text = answer.content.trim().to_string();

        if self.settings.remember_history {
            self.history.push_exchange(Message::user(question), answer);
        }
        Ok(text)
    }

    fn build_messages(&self, question: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.messages().len() + 2);
        if let Some(system) = self.settings.system_msg.as_deref().filter(|s| !s.is_empty()) {
            messages.push(Message::system(system));
        }
        if self.settings.remember_history {
            messages.extend_from_slice(self.history.messages());
        }
        messages.push(Message::user(question));
        messages
    }
}

/// First choice (index 0) that finished normally.
fn pick_answer(response: ChatCompletionResponse) -> Option<Message> {
    response
        .choices
        .into_iter()
        .find(|c| c.index == 0 && matches!(c.finish_reason.as_deref(), None | Some("stop")))
        .map(|c| c.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Role;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays canned responses and records what was sent
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<Value, PxError>>>,
        sent: Arc<Mutex<Vec<ChatCompletionRequest>>>,
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(&self, request: &ChatCompletionRequest) -> Result<Value, PxError> {
            self.sent.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PxError::Http("no scripted reply".to_string())))
        }
    }

    fn answer(content: &str) -> Result<Value, PxError> {
        Ok(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": {"role": "assistant", "content": content}
            }]
        }))
    }

    fn api(
        replies: Vec<Result<Value, PxError>>,
        system_msg: Option<&str>,
        history_exchanges: usize,
    ) -> (ChatApi, Arc<Mutex<Vec<ChatCompletionRequest>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = ScriptedTransport {
            replies: Mutex::new(replies.into()),
            sent: Arc::clone(&sent),
        };
        let settings = ChatSettings {
            model: "gpt-test".to_string(),
            system_msg: system_msg.map(str::to_string),
            remember_history: true,
            history_exchanges,
        };
        (ChatApi::new(settings, Box::new(transport)), sent)
    }

    #[tokio::test]
    async fn returns_trimmed_answer_and_sends_system_message() {
        let (mut api, sent) = api(vec![answer("\n  The Dodgers.  \n")], Some("Be helpful."), 5);

        let text = api.chat("Who won in 2020?").await.unwrap();
        assert_eq!(text, "The Dodgers.");

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].model, "gpt-test");
        assert_eq!(
            sent[0].messages,
            vec![Message::system("Be helpful."), Message::user("Who won in 2020?")]
        );
    }

    #[tokio::test]
    async fn replays_history_on_follow_up() {
        let (mut api, sent) = api(vec![answer("Dodgers"), answer("Texas")], None, 5);

        api.chat("Who won?").await.unwrap();
        api.chat("Where was it played?").await.unwrap();

        let sent = sent.lock().unwrap();
        let roles: Vec<Role> = sent[1].messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(sent[1].messages[1].content, "Dodgers");
        assert_eq!(api.history().exchanges(), 2);
    }

    #[tokio::test]
    async fn history_is_capped() {
        let (mut api, sent) = api(vec![answer("1"), answer("2"), answer("3")], None, 1);

        for q in ["a", "b", "c"] {
            api.chat(q).await.unwrap();
        }
        let sent = sent.lock().unwrap();
        // Third request carries only the exchange before it
        assert_eq!(
            sent[2].messages,
            vec![Message::user("b"), Message::assistant("2"), Message::user("c")]
        );
    }

    #[tokio::test]
    async fn transport_failure_leaves_history_untouched() {
        let (mut api, _) = api(vec![Err(PxError::Http("boom".to_string()))], None, 5);

        let err = api.chat("hi").await.unwrap_err();
        assert!(matches!(err, PxError::Chat(ref m) if m.contains("boom")));
        assert!(api.history().is_empty());
    }

    #[tokio::test]
    async fn unfinished_or_missing_choices_are_errors() {
        let length_cut = Ok(json!({
            "choices": [{
                "index": 0,
                "finish_reason": "length",
                "message": {"role": "assistant", "content": "partial"}
            }]
        }));
        let empty = Ok(json!({"choices": []}));
        let (mut api, _) = api(vec![length_cut, empty], None, 5);

        for _ in 0..2 {
            let err = api.chat("hi").await.unwrap_err();
            assert!(matches!(err, PxError::Chat(ref m) if m.contains("no answer choices")));
        }
    }

    #[tokio::test]
    async fn null_finish_reason_is_accepted() {
        let reply = Ok(json!({
            "choices": [{
                "index": 0,
                "finish_reason": null,
                "message": {"role": "assistant", "content": "ok"}
            }]
        }));
        let (mut api, _) = api(vec![reply], None, 5);
        assert_eq!(api.chat("hi").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn without_memory_each_question_stands_alone() {
        let (mut api, sent) = api(vec![answer("x"), answer("y")], None, 5);
        api.settings.remember_history = false;

        api.chat("first").await.unwrap();
        api.chat("second").await.unwrap();
        assert_eq!(sent.lock().unwrap()[1].messages, vec![Message::user("second")]);
        assert!(api.history().is_empty());
    }
}

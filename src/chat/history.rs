use crate::providers::Message;

/// Past user/assistant exchanges, capped to the most recent `max_exchanges`
#[derive(Debug, Clone)]
pub struct ChatHistory {
    messages: Vec<Message>,
    max_exchanges: usize,
}

impl ChatHistory {
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_exchanges,
        }
    }

    /// Record one exchange, dropping the oldest ones beyond the cap.
    pub fn push_exchange(&mut self, question: Message, answer: Message) {
        self.messages.push(question);
        self.messages.push(answer);

        let excess = self.messages.len().saturating_sub(self.max_exchanges.saturating_mul(2));
        self.messages.drain(..excess);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn exchanges(&self) -> usize {
        self.messages.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

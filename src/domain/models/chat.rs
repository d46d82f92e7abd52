use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered turns, oldest first. Supplied fresh on every call.
pub type ConversationHistory = Vec<ChatTurn>;

/// One front-end exchange: what the user typed and what the assistant replied.
/// Either half may be missing while a reply is still in flight.
pub type Exchange = (Option<String>, Option<String>);

/// Flattens front-end exchanges into API turns. Empty halves are skipped
/// without error.
pub fn history_from_exchanges(exchanges: &[Exchange]) -> ConversationHistory {
    let mut history = Vec::with_capacity(exchanges.len() * 2);
    for (user, assistant) in exchanges {
        if let Some(text) = user.as_deref().filter(|t| !t.is_empty()) {
            history.push(ChatTurn::user(text));
        }
        if let Some(text) = assistant.as_deref().filter(|t| !t.is_empty()) {
            history.push(ChatTurn::assistant(text));
        }
    }
    history
}

/// Everything a provider needs for one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub system: String,
    pub messages: ConversationHistory,
}

impl ChatRequest {
    /// `history` followed by `message` as a new user turn.
    pub fn new(system: impl Into<String>, history: &[ChatTurn], message: &str) -> Self {
        let mut messages = history.to_vec();
        messages.push(ChatTurn::user(message));
        Self {
            system: system.into(),
            messages,
        }
    }
}

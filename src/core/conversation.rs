use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self.role, Role::User)
    }

    #[must_use]
    pub const fn is_assistant(&self) -> bool {
        matches!(self.role, Role::Assistant)
    }
}

/// Ordered transcript value.
///
/// Conversations are never edited in place: every change produces a new
/// value, so a snapshot handed to a reader stays valid no matter what the
/// owner does next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Returns `self ++ [message]`.
    #[must_use]
    pub fn appended(&self, message: Message) -> Self {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend_from_slice(&self.messages);
        messages.push(message);
        Self { messages }
    }

    /// Returns a copy whose final message is `message`.
    ///
    /// The previous final message is dropped; on an empty conversation this
    /// behaves like [`Conversation::appended`].
    #[must_use]
    pub fn replacing_last(&self, message: Message) -> Self {
        let keep = self.messages.len().saturating_sub(1);
        let mut messages = Vec::with_capacity(keep + 1);
        messages.extend_from_slice(&self.messages[..keep]);
        messages.push(message);
        Self { messages }
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result = serde_json::from_str::<Message>(r#"{"role":"system","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn appended_leaves_original_untouched() {
        let base = Conversation::from(vec![Message::user("one")]);
        let next = base.appended(Message::assistant("two"));

        assert_eq!(base.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.last(), Some(&Message::assistant("two")));
    }

    #[test]
    fn replacing_last_swaps_final_message() {
        let base = Conversation::from(vec![Message::user("q"), Message::assistant("Hel")]);
        let next = base.replacing_last(Message::assistant("Hello"));

        assert_eq!(next.len(), 2);
        assert_eq!(next.messages()[0], Message::user("q"));
        assert_eq!(next.messages()[1].content, "Hello");
        assert_eq!(base.messages()[1].content, "Hel");
    }

    #[test]
    fn replacing_last_on_empty_appends() {
        let next = Conversation::new().replacing_last(Message::assistant("x"));
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn conversation_serializes_as_array() {
        let conversation = Conversation::from(vec![Message::user("a"), Message::assistant("b")]);
        let value = serde_json::to_value(&conversation).unwrap();
        assert!(value.is_array());
        assert_eq!(value[1]["role"], "assistant");
    }
}

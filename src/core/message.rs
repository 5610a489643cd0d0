use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == Sender::User
    }

    pub fn is_assistant(self) -> bool {
        self == Sender::Assistant
    }
}

impl AsRef<str> for Sender {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Sender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Sender::User),
            "assistant" => Ok(Sender::Assistant),
            _ => Err(format!("invalid sender: {value}")),
        }
    }
}

impl TryFrom<String> for Sender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        value.as_str().to_string()
    }
}

/// Where a message is in its lifecycle. A user message is `Complete` from the
/// moment it is created; an assistant message starts `Pending` and ends
/// `Complete` when the reveal finishes, or `Error` if the request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Pending,
    Complete,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub status: MessageStatus,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            status: MessageStatus::Complete,
        }
    }

    /// The empty assistant slot appended when a request goes out. The reveal
    /// fills in `text` word by word.
    pub fn pending_assistant() -> Self {
        Self {
            sender: Sender::Assistant,
            text: String::new(),
            status: MessageStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }

    pub fn is_error(&self) -> bool {
        self.status == MessageStatus::Error
    }
}

/// The ordered list of all messages in the current session. Messages are only
/// appended or mutated in place; the sole removal operation is a full clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Message> {
        self.messages.last_mut()
    }

    /// The newest assistant message whose text is settled (revealed or error).
    /// Pending messages are still being filled in and cannot be copied.
    pub fn latest_copyable(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender.is_assistant() && !m.is_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_round_trips_through_strings() {
        assert_eq!(Sender::try_from("user"), Ok(Sender::User));
        assert_eq!(String::from(Sender::Assistant), "assistant");
    }

    #[test]
    fn invalid_sender_strings_are_rejected() {
        assert!(Sender::try_from("system").is_err());
    }

    #[test]
    fn user_messages_are_complete_on_creation() {
        let msg = Message::user("hello");
        assert_eq!(msg.status, MessageStatus::Complete);
        assert!(!msg.is_pending());
    }

    #[test]
    fn latest_copyable_skips_pending_and_user_messages() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("first"));
        let mut done = Message::pending_assistant();
        done.text = "answer".to_string();
        done.status = MessageStatus::Complete;
        transcript.push(done);
        transcript.push(Message::user("second"));
        transcript.push(Message::pending_assistant());

        let copyable = transcript.latest_copyable().expect("one settled message");
        assert_eq!(copyable.text, "answer");
    }

    #[test]
    fn message_json_uses_string_roles() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(
            json,
            r#"{"sender":"user","text":"hi","status":"complete"}"#
        );
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Message::user("hi"));
    }
}

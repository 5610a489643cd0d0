//! The chat session state machine.
//!
//! `ChatSession` owns the transcript and the single in-flight request state.
//! Transitions:
//! - `Idle -> AwaitingResponse` on an accepted submit (non-empty trimmed
//!   input while idle).
//! - `AwaitingResponse -> Idle` when the reveal finishes, when the request
//!   fails, or on a full transcript clear.
//!
//! Submits while a response is outstanding are dropped, never queued.

use crate::core::message::{Message, MessageStatus, Transcript};

/// Delay between an accepted submit and the outgoing request.
pub const SUBMIT_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug)]
pub struct ChatSession {
    transcript: Transcript,
    state: SessionState,
}

impl ChatSession {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            transcript,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.state == SessionState::AwaitingResponse
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Accepts `input` if it trims to something non-empty and no request is
    /// outstanding. On acceptance the user message is appended and the trimmed
    /// text to send is returned; the caller schedules the outgoing call.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || self.is_awaiting_response() {
            return None;
        }
        self.state = SessionState::AwaitingResponse;
        self.transcript.push(Message::user(text));
        Some(text.to_string())
    }

    /// Called when the delayed request actually goes out: appends the pending
    /// assistant slot the reveal will fill in.
    pub fn begin_response(&mut self) {
        debug_assert!(self.is_awaiting_response());
        self.transcript.push(Message::pending_assistant());
    }

    /// Appends one revealed word to the pending assistant message.
    pub fn append_revealed_word(&mut self, word: &str) {
        if let Some(message) = self.pending_response_mut() {
            if !message.text.is_empty() {
                message.text.push(' ');
            }
            message.text.push_str(word);
        }
    }

    /// Terminal success transition: the reveal has shown the last word.
    pub fn finish_response(&mut self) {
        if let Some(message) = self.pending_response_mut() {
            message.status = MessageStatus::Complete;
        }
        self.state = SessionState::Idle;
    }

    /// Terminal failure transition: the error text is shown in place of the
    /// response, with no reveal.
    pub fn fail_response(&mut self, error_text: &str) {
        if let Some(message) = self.pending_response_mut() {
            message.text = error_text.to_string();
            message.status = MessageStatus::Error;
        }
        self.state = SessionState::Idle;
    }

    /// Transcript-wide clear. Discards any in-flight cycle; the caller is
    /// responsible for cancelling its scheduled tasks.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.state = SessionState::Idle;
    }

    fn pending_response_mut(&mut self) -> Option<&mut Message> {
        self.transcript.last_mut().filter(|m| m.is_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Sender;
    use crate::core::reveal::{strip_bold_markers, Reveal};

    #[test]
    fn whitespace_only_input_is_a_no_op() {
        let mut session = ChatSession::new(Transcript::new());
        assert_eq!(session.submit("   \t  "), None);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn second_submit_while_awaiting_is_dropped() {
        let mut session = ChatSession::new(Transcript::new());
        assert_eq!(session.submit("first"), Some("first".to_string()));
        assert_eq!(session.submit("second"), None);
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn input_is_trimmed_before_recording() {
        let mut session = ChatSession::new(Transcript::new());
        assert_eq!(session.submit("  hello  "), Some("hello".to_string()));
        assert_eq!(session.transcript().last().unwrap().text, "hello");
    }

    #[test]
    fn failure_shows_error_text_and_returns_to_idle() {
        let mut session = ChatSession::new(Transcript::new());
        session.submit("hello");
        session.begin_response();
        session.fail_response("API key not valid");

        let message = session.transcript().last().unwrap();
        assert_eq!(message.text, "API key not valid");
        assert_eq!(message.status, MessageStatus::Error);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn clear_discards_everything_and_goes_idle() {
        let mut session = ChatSession::new(Transcript::new());
        session.submit("hello");
        session.begin_response();
        session.clear();
        assert!(session.transcript().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    // The worked example from the original interface: "Hello there" in,
    // "Hi **there**" back, revealed as "Hi" then "Hi there".
    #[test]
    fn full_cycle_reveals_response_word_by_word() {
        let mut session = ChatSession::new(Transcript::new());
        assert_eq!(session.submit("Hello there"), Some("Hello there".to_string()));
        assert!(session.is_awaiting_response());

        session.begin_response();
        assert!(session.transcript().last().unwrap().is_pending());

        let mut reveal = Reveal::new(&strip_bold_markers("Hi **there**"));
        let word = reveal.tick().unwrap().to_string();
        session.append_revealed_word(&word);
        assert_eq!(session.transcript().last().unwrap().text, "Hi");

        let word = reveal.tick().unwrap().to_string();
        session.append_revealed_word(&word);
        assert_eq!(session.transcript().last().unwrap().text, "Hi there");

        assert!(reveal.is_done());
        session.finish_response();

        let message = session.transcript().last().unwrap();
        assert_eq!(message.sender, Sender::Assistant);
        assert_eq!(message.status, MessageStatus::Complete);
        assert_eq!(session.state(), SessionState::Idle);
    }
}

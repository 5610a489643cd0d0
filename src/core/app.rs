//! Runtime state for an interactive chat session.

use crate::api::GeminiClient;
use crate::core::log::TranscriptLog;
use crate::core::reveal::Reveal;
use crate::core::schedule::TaskHandle;
use crate::core::session::ChatSession;
use crate::core::store::{SessionStore, ThemePreference};
use crate::ui::theme::Theme;

/// Suggestion prompts shown on the greeting screen while the transcript is
/// empty. Picking one submits it as the user message.
pub const SUGGESTIONS: [&str; 4] = [
    "Help me plan a game night with five friends",
    "What are good tips to improve public speaking?",
    "Summarize how HTTP caching works",
    "Write a short poem about terminals",
];

pub struct App {
    pub session: ChatSession,
    pub store: SessionStore,
    pub client: GeminiClient,
    pub theme: Theme,
    pub theme_preference: ThemePreference,
    pub transcript_log: TranscriptLog,

    pub input: String,
    pub reveal: Option<Reveal>,
    pub reveal_task: Option<TaskHandle>,
    pub dispatch_task: Option<TaskHandle>,
    pub notice: Option<String>,
    pub notice_task: Option<TaskHandle>,
    pub confirm_clear: bool,

    pub scroll_offset: u16,
    pub auto_scroll: bool,
}

impl App {
    pub fn new(
        session: ChatSession,
        store: SessionStore,
        client: GeminiClient,
        theme_preference: ThemePreference,
        transcript_log: TranscriptLog,
    ) -> Self {
        Self {
            session,
            store,
            client,
            theme: Theme::for_preference(theme_preference),
            theme_preference,
            transcript_log,
            input: String::new(),
            reveal: None,
            reveal_task: None,
            dispatch_task: None,
            notice: None,
            notice_task: None,
            confirm_clear: false,
            scroll_offset: 0,
            auto_scroll: true,
        }
    }

    /// Cancel every outstanding timer. Called on teardown and on transcript
    /// clear so no ticker outlives the cycle it belongs to.
    pub fn cancel_timers(&mut self) {
        for task in [
            self.reveal_task.take(),
            self.dispatch_task.take(),
            self.notice_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.cancel();
        }
    }

    /// Replace the transient status notice, dropping the previous revert
    /// timer. The caller schedules the new revert.
    pub fn set_notice(&mut self, text: impl Into<String>) {
        if let Some(task) = self.notice_task.take() {
            task.cancel();
        }
        self.notice = Some(text.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
        self.notice_task = None;
    }

    /// The greeting screen shows until the first message lands.
    pub fn showing_greeting(&self) -> bool {
        self.session.transcript().is_empty()
    }

    pub fn calculate_max_scroll_offset(&self, available_height: u16) -> u16 {
        let total_lines = crate::ui::renderer::build_display_lines(self).len() as u16;
        total_lines.saturating_sub(available_height)
    }

    /// Pin the view to the newest line while auto-scroll is engaged.
    pub fn scroll_to_bottom(&mut self, available_height: u16) {
        if self.auto_scroll {
            self.scroll_offset = self.calculate_max_scroll_offset(available_height);
        }
    }
}

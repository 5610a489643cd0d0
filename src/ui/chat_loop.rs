//! The interactive event loop.
//!
//! The loop owns the terminal and the [`App`]; background work (the delayed
//! request dispatch, the HTTP call, the reveal ticker, the notice revert)
//! runs in spawned tasks that report back over an unbounded channel. The
//! session state machine keeps at most one request/reveal cycle in flight.

use crate::api::ApiError;
use crate::core::app::{App, SUGGESTIONS};
use crate::core::reveal::{strip_bold_markers, Reveal, REVEAL_TICK_MS};
use crate::core::schedule;
use crate::core::session::SUBMIT_DELAY_MS;
use crate::ui::renderer::ui;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{error::Error, io, time::Duration};
use tokio::sync::mpsc::{self, UnboundedSender};

const NOTICE_REVERT_MS: u64 = 1000;

/// Events delivered back to the loop by scheduled tasks and the request task.
#[derive(Debug)]
pub enum AppEvent {
    /// The post-submit delay elapsed; the request should go out now.
    DispatchRequest { text: String },
    ResponseReady(Result<String, ApiError>),
    RevealTick,
    NoticeExpired,
}

type LoopTerminal = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run_chat(mut app: App) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let result = event_loop(&mut terminal, &mut app, &tx, &mut rx).await;

    app.cancel_timers();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut LoopTerminal,
    app: &mut App,
    tx: &UnboundedSender<AppEvent>,
    rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, app))?;
        let available_height = available_height(terminal);

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(app, tx, key, available_height) == LoopAction::Quit {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => scroll_up(app, 3),
                    MouseEventKind::ScrollDown => scroll_down(app, available_height, 3),
                    _ => {}
                },
                _ => {}
            }
        }

        while let Ok(app_event) = rx.try_recv() {
            handle_app_event(app, tx, app_event, available_height);
        }
    }
}

#[derive(PartialEq)]
enum LoopAction {
    Continue,
    Quit,
}

fn handle_key(
    app: &mut App,
    tx: &UnboundedSender<AppEvent>,
    key: KeyEvent,
    available_height: u16,
) -> LoopAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return LoopAction::Quit;
    }

    // The delete-all confirmation is modal: only y/n/Esc mean anything.
    if app.confirm_clear {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => clear_transcript(app, tx),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_clear = false,
            _ => {}
        }
        return LoopAction::Continue;
    }

    match key.code {
        KeyCode::Enter => {
            let input = app.input.clone();
            submit(app, tx, &input, available_height);
        }
        KeyCode::Char(c @ '1'..='4')
            if key.modifiers.contains(KeyModifiers::ALT) && app.showing_greeting() =>
        {
            let index = c as usize - '1' as usize;
            submit(app, tx, SUGGESTIONS[index], available_height);
        }
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            toggle_theme(app, tx);
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.confirm_clear = true;
        }
        KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            copy_latest_response(app, tx);
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.push(c);
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Up => scroll_up(app, 1),
        KeyCode::Down => scroll_down(app, available_height, 1),
        _ => {}
    }
    LoopAction::Continue
}

/// An accepted submit records the user message, clears the input, and starts
/// the "thinking" delay; the request itself goes out when the delay elapses.
fn submit(app: &mut App, tx: &UnboundedSender<AppEvent>, input: &str, available_height: u16) {
    let Some(text) = app.session.submit(input) else {
        return;
    };
    app.input.clear();
    app.auto_scroll = true;
    app.scroll_to_bottom(available_height);

    if let Err(e) = app.transcript_log.record("You", &text) {
        tracing::warn!(error = %e, "failed to write transcript log");
    }

    app.dispatch_task = Some(schedule::once(
        tx.clone(),
        Duration::from_millis(SUBMIT_DELAY_MS),
        AppEvent::DispatchRequest { text },
    ));
}

fn handle_app_event(
    app: &mut App,
    tx: &UnboundedSender<AppEvent>,
    app_event: AppEvent,
    available_height: u16,
) {
    match app_event {
        AppEvent::DispatchRequest { text } => {
            app.dispatch_task = None;
            app.session.begin_response();
            app.scroll_to_bottom(available_height);

            let client = app.client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = client.generate_content(&text).await;
                let _ = tx.send(AppEvent::ResponseReady(result));
            });
        }
        AppEvent::ResponseReady(result) => {
            // A response landing after a transcript clear has no cycle to
            // finish; drop it.
            if !app.session.is_awaiting_response() {
                return;
            }
            match result {
                Ok(text) => {
                    let reveal = Reveal::new(&strip_bold_markers(&text));
                    if reveal.is_done() {
                        finish_reveal(app);
                    } else {
                        app.reveal = Some(reveal);
                        app.reveal_task = Some(schedule::repeating(
                            tx.clone(),
                            Duration::from_millis(REVEAL_TICK_MS),
                            || AppEvent::RevealTick,
                        ));
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "generateContent request failed");
                    app.session.fail_response(&e.to_string());
                    app.scroll_to_bottom(available_height);
                }
            }
        }
        AppEvent::RevealTick => {
            let Some(reveal) = app.reveal.as_mut() else {
                return;
            };
            let word = reveal.tick().map(str::to_string);
            let done = reveal.is_done();
            if let Some(word) = word {
                app.session.append_revealed_word(&word);
                app.scroll_to_bottom(available_height);
            }
            if done {
                if let Some(task) = app.reveal_task.take() {
                    task.cancel();
                }
                app.reveal = None;
                finish_reveal(app);
            }
        }
        AppEvent::NoticeExpired => app.clear_notice(),
    }
}

/// Terminal success transition: complete the message, persist the transcript,
/// log the exchange.
fn finish_reveal(app: &mut App) {
    app.session.finish_response();

    if let Some(message) = app.session.transcript().last() {
        if let Err(e) = app.transcript_log.record("Gemini", &message.text) {
            tracing::warn!(error = %e, "failed to write transcript log");
        }
    }

    if let Err(e) = app.store.save(app.session.transcript()) {
        tracing::error!(error = %e, "failed to persist transcript");
    }
}

fn toggle_theme(app: &mut App, tx: &UnboundedSender<AppEvent>) {
    app.theme_preference = app.theme_preference.toggled();
    app.theme = crate::ui::theme::Theme::for_preference(app.theme_preference);
    if let Err(e) = app.store.set_theme(app.theme_preference) {
        tracing::error!(error = %e, "failed to persist theme");
        show_notice(app, tx, format!("Theme not saved: {e}"));
    }
}

fn copy_latest_response(app: &mut App, tx: &UnboundedSender<AppEvent>) {
    let Some(message) = app.session.transcript().latest_copyable() else {
        show_notice(app, tx, "Nothing to copy yet");
        return;
    };
    match crate::utils::clipboard::copy_to_clipboard(&message.text) {
        Ok(()) => show_notice(app, tx, "Copied to clipboard"),
        Err(e) => show_notice(app, tx, e.to_string()),
    }
}

/// Confirmed delete-all: cancel any in-flight cycle, wipe the transcript, and
/// remove the persisted snapshot.
fn clear_transcript(app: &mut App, tx: &UnboundedSender<AppEvent>) {
    app.confirm_clear = false;
    app.cancel_timers();
    app.reveal = None;
    app.session.clear();
    app.scroll_offset = 0;
    app.auto_scroll = true;

    match app.store.clear() {
        Ok(()) => show_notice(app, tx, "Chat history deleted"),
        Err(e) => {
            tracing::error!(error = %e, "failed to clear saved transcript");
            show_notice(app, tx, format!("Delete failed: {e}"));
        }
    }
}

/// Transient status text next to the title, reverted by a scheduled task
/// after one second.
fn show_notice(app: &mut App, tx: &UnboundedSender<AppEvent>, text: impl Into<String>) {
    app.set_notice(text);
    app.notice_task = Some(schedule::once(
        tx.clone(),
        Duration::from_millis(NOTICE_REVERT_MS),
        AppEvent::NoticeExpired,
    ));
}

fn available_height(terminal: &LoopTerminal) -> u16 {
    // 3 rows for the input box, 1 for the transcript title
    let height = terminal.size().map(|s| s.height).unwrap_or_default();
    height.saturating_sub(3).saturating_sub(1)
}

fn scroll_up(app: &mut App, step: u16) {
    app.auto_scroll = false;
    app.scroll_offset = app.scroll_offset.saturating_sub(step);
}

fn scroll_down(app: &mut App, available_height: u16, step: u16) {
    let max_scroll = app.calculate_max_scroll_offset(available_height);
    app.scroll_offset = app.scroll_offset.saturating_add(step).min(max_scroll);
    if app.scroll_offset >= max_scroll {
        app.auto_scroll = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GeminiClient;
    use crate::core::log::TranscriptLog;
    use crate::core::message::MessageStatus;
    use crate::core::session::ChatSession;
    use crate::core::store::{SessionStore, ThemePreference};
    use tempfile::TempDir;

    fn app_in_temp_dir() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at_path(dir.path()).unwrap();
        let client = GeminiClient::new(
            "http://localhost:0".to_string(),
            "gemini-pro".to_string(),
            "test-key".to_string(),
        );
        let app = App::new(
            ChatSession::new(crate::core::message::Transcript::new()),
            store,
            client,
            ThemePreference::Dark,
            TranscriptLog::disabled(),
        );
        (dir, app)
    }

    #[tokio::test]
    async fn response_reveals_and_persists_on_the_last_tick() {
        let (_dir, mut app) = app_in_temp_dir();
        let (tx, _rx) = mpsc::unbounded_channel();

        app.session.submit("Hello there").unwrap();
        app.session.begin_response();
        handle_app_event(
            &mut app,
            &tx,
            AppEvent::ResponseReady(Ok("Hi **there**".to_string())),
            20,
        );
        assert!(app.reveal.is_some());

        handle_app_event(&mut app, &tx, AppEvent::RevealTick, 20);
        assert_eq!(app.session.transcript().last().unwrap().text, "Hi");
        assert!(app.session.is_awaiting_response());

        handle_app_event(&mut app, &tx, AppEvent::RevealTick, 20);
        let message = app.session.transcript().last().unwrap();
        assert_eq!(message.text, "Hi there");
        assert_eq!(message.status, MessageStatus::Complete);
        assert!(!app.session.is_awaiting_response());
        assert!(app.reveal.is_none());

        let (persisted, _) = app.store.load();
        assert_eq!(persisted, *app.session.transcript());
    }

    #[tokio::test]
    async fn failed_response_shows_error_without_revealing() {
        let (_dir, mut app) = app_in_temp_dir();
        let (tx, _rx) = mpsc::unbounded_channel();

        app.session.submit("Hello there").unwrap();
        app.session.begin_response();
        handle_app_event(
            &mut app,
            &tx,
            AppEvent::ResponseReady(Err(ApiError::Api {
                message: "API key not valid".to_string(),
            })),
            20,
        );

        let message = app.session.transcript().last().unwrap();
        assert_eq!(message.text, "API key not valid");
        assert_eq!(message.status, MessageStatus::Error);
        assert!(!app.session.is_awaiting_response());
        assert!(app.reveal.is_none());

        // No reveal ran, so nothing was persisted either.
        let (persisted, _) = app.store.load();
        assert!(persisted.is_empty());
    }

    #[tokio::test]
    async fn responses_after_a_clear_are_dropped() {
        let (_dir, mut app) = app_in_temp_dir();
        let (tx, _rx) = mpsc::unbounded_channel();

        app.session.submit("Hello there").unwrap();
        app.session.begin_response();
        clear_transcript(&mut app, &tx);

        handle_app_event(
            &mut app,
            &tx,
            AppEvent::ResponseReady(Ok("too late".to_string())),
            20,
        );
        assert!(app.session.transcript().is_empty());
        assert!(app.reveal.is_none());
    }
}

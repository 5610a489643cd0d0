//! Command-line interface parsing and startup wiring.

use std::env;
use std::error::Error;

use clap::Parser;

use crate::api::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::app::App;
use crate::core::config::Config;
use crate::core::log::TranscriptLog;
use crate::core::session::ChatSession;
use crate::core::store::{SessionStore, ThemePreference};
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "glimmer")]
#[command(about = "A terminal chat client for the Gemini API")]
#[command(long_about = "Glimmer is a full-screen terminal chat client for Google's Gemini API. \
Responses are revealed word by word, and the conversation is restored the next \
time you start it.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    Your Gemini API key (required)\n\
  GEMINI_BASE_URL   Custom API base URL (optional)\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Alt+1..4          Send a suggestion from the greeting screen\n\
  Ctrl+T            Toggle between dark and light theme\n\
  Ctrl+Y            Copy the newest response to the clipboard\n\
  Ctrl+D            Delete all messages (asks for confirmation)\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+C            Quit the application")]
pub struct Args {
    /// Gemini model to use for chat
    #[arg(short, long)]
    pub model: Option<String>,

    /// Append each exchange to this plain-text log file
    #[arg(short = 'l', long)]
    pub log: Option<String>,

    /// Theme for this session ("dark" or "light"); overrides the saved choice
    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = Config::load()?;

    let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
        "Error: GEMINI_API_KEY environment variable not set

Please set your Gemini API key:
export GEMINI_API_KEY=\"your-api-key-here\"

Optionally, you can also set a custom base URL:
export GEMINI_BASE_URL=\"https://generativelanguage.googleapis.com\""
    })?;

    let base_url = env::var("GEMINI_BASE_URL")
        .ok()
        .or(config.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let model = args
        .model
        .or(config.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let store = SessionStore::open_default()?;
    crate::logging::init_diagnostics(store.dir());

    let (transcript, _) = store.load();
    let theme_preference = args
        .theme
        .as_deref()
        .and_then(ThemePreference::from_name)
        .or_else(|| store.saved_theme())
        .or_else(|| config.theme.as_deref().and_then(ThemePreference::from_name))
        .unwrap_or_default();

    let transcript_log = TranscriptLog::new(args.log)?;
    let client = GeminiClient::new(base_url, model, api_key);
    let session = ChatSession::new(transcript);

    tracing::info!(model = client.model(), "starting chat session");
    let app = App::new(session, store, client, theme_preference, transcript_log);
    run_chat(app).await
}

//! Glimmer is a terminal chat client for Google's Gemini API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript view-model, the chat session state machine,
//!   the word-reveal stepper, scheduled-task handles, and on-disk persistence
//!   of the conversation and theme preference.
//! - [`ui`] renders the transcript with ratatui and runs the interactive
//!   event loop that drives user input and display updates.
//! - [`api`] defines the Gemini `generateContent` wire payloads and the HTTP
//!   client that issues one request per submitted message.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which wires configuration, persistence, and
//! the API client into [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;

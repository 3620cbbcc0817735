//! recap: studio client for AI-assisted video transcription and summarization.
//!
//! This crate is the client half of a video summarization service: the
//! backend transcribes an uploaded video and streams prompt completions;
//! this crate owns the studio session state and the request lifecycle.
//!
//! # Architecture
//!
//! Two concerns cooperate over one state container:
//! - **Theme controller** ([`theme`]): resolves the light/dark preference
//!   at startup (stored value wins, ambient signal otherwise) and persists
//!   every explicit toggle.
//! - **Completion coordinator** ([`completion`]): assembles a streaming
//!   completion request from form state, drives fragments back through an
//!   event channel, and supersedes older submissions by generation number.
//!
//! The [`studio::Studio`] container is the sole mutator of session state;
//! all events are applied on a single consumer thread.

pub mod completion;
pub mod config;
pub mod error;
pub mod prompts;
pub mod recap_dirs;
pub mod studio;
pub mod theme;

pub use completion::{
    CompletionBackend, CompletionCoordinator, CompletionErrorKind, CompletionEvent,
    CompletionRequest, HttpCompletionBackend,
};
pub use config::StudioConfig;
pub use error::{Result, StudioError};
pub use studio::{CompletionState, StateChange, Studio};
pub use theme::{Theme, ThemeController};

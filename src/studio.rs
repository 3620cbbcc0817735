//! Studio session state: the single owner of all transient UI state.
//!
//! [`Studio`] holds the four pieces of state the view mutates (theme
//! preference, generation parameters, prompt text, completion state) and
//! is their sole mutator. Everything runs on one consumer thread: input
//! handlers call the setters, and completion events drained from the
//! coordinator's channel are applied through [`Studio::apply_event`],
//! which drops events from superseded submissions.

use crate::completion::{
    CompletionCoordinator, CompletionErrorKind, CompletionEvent, CompletionRequest,
};
use crate::config::StudioConfig;
use crate::theme::{Theme, ThemeController};

/// Completion request state as observed by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionState {
    /// Accumulated response text, in fragment arrival order.
    pub result_text: String,
    /// True strictly between submission and that submission's terminal
    /// outcome (or its supersession by a newer submission).
    pub in_flight: bool,
    /// Failure of the most recent submission, when it failed.
    pub last_error: Option<CompletionErrorKind>,
}

/// What applying a completion event changed, for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// A fragment was appended to the result text.
    Appended(String),
    /// The current submission finished normally.
    Finished,
    /// The current submission failed; partial text is retained.
    Failed(CompletionErrorKind),
    /// The event belonged to a superseded submission and was dropped.
    IgnoredStale,
}

/// The studio session: owns all view state and coordinates mutations.
pub struct Studio {
    theme: ThemeController,
    temperature: f64,
    video_id: Option<String>,
    prompt: String,
    completion: CompletionState,
    coordinator: CompletionCoordinator,
    active_generation: u64,
}

impl Studio {
    /// Create a session from configuration, a resolved theme controller,
    /// and a completion coordinator.
    pub fn new(
        config: &StudioConfig,
        theme: ThemeController,
        coordinator: CompletionCoordinator,
    ) -> Self {
        Self {
            theme,
            temperature: config.generation.temperature.clamp(0.0, 1.0),
            video_id: None,
            prompt: String::new(),
            completion: CompletionState::default(),
            coordinator,
            active_generation: 0,
        }
    }

    // ── Theme ─────────────────────────────────────────────────

    /// The active theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    /// The dark root marker consumed by the renderer.
    #[must_use]
    pub fn dark_root(&self) -> bool {
        self.theme.dark_root()
    }

    /// Toggle the theme and persist the choice.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle()
    }

    // ── Generation parameters ─────────────────────────────────

    /// Current temperature.
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Set the temperature, clamped to \[0.0, 1.0\].
    ///
    /// The clamp is the input control's min/max contract; nothing
    /// downstream re-validates.
    pub fn set_temperature(&mut self, value: f64) {
        self.temperature = value.clamp(0.0, 1.0);
    }

    /// Identifier of the uploaded video, when one exists.
    #[must_use]
    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    /// Upload collaborator callback: record the new video identifier.
    pub fn on_video_uploaded(&mut self, id: impl Into<String>) {
        let id = id.into();
        tracing::info!(video_id = %id, "video uploaded");
        self.video_id = Some(id);
    }

    // ── Prompt ────────────────────────────────────────────────

    /// Current prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replace the prompt text (user typing).
    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    /// Template collaborator callback: replace the prompt wholesale.
    ///
    /// Allowed while a request is in flight; the in-flight request keeps
    /// the prompt it captured at submit time.
    pub fn on_prompt_selected(&mut self, template: impl Into<String>) {
        self.prompt = template.into();
    }

    // ── Completion lifecycle ──────────────────────────────────

    /// Completion state for rendering.
    #[must_use]
    pub fn completion(&self) -> &CompletionState {
        &self.completion
    }

    /// Submit the current form state as a completion request.
    ///
    /// Resets the result text and failure indicator, marks the session
    /// in flight before dispatch, and supersedes any outstanding
    /// submission. Returns the new submission's generation.
    pub fn submit(&mut self) -> u64 {
        self.completion.result_text.clear();
        self.completion.last_error = None;
        self.completion.in_flight = true;

        let request = CompletionRequest {
            prompt: self.prompt.clone(),
            video_id: self.video_id.clone(),
            temperature: self.temperature,
        };
        self.active_generation = self.coordinator.submit(request);
        self.active_generation
    }

    /// Apply one event drained from the coordinator's channel.
    ///
    /// Events tagged with a generation other than the latest submission
    /// are dropped (last-submission-wins). Fragments append in arrival
    /// order; terminal events clear the in-flight flag, and failures
    /// retain whatever text already accumulated.
    pub fn apply_event(&mut self, event: CompletionEvent) -> StateChange {
        if event.generation() != self.active_generation {
            tracing::trace!(
                generation = event.generation(),
                active = self.active_generation,
                "dropping event from superseded submission"
            );
            return StateChange::IgnoredStale;
        }

        match event {
            CompletionEvent::Fragment { text, .. } => {
                self.completion.result_text.push_str(&text);
                StateChange::Appended(text)
            }
            CompletionEvent::Finished { .. } => {
                self.completion.in_flight = false;
                StateChange::Finished
            }
            CompletionEvent::Failed { error, .. } => {
                tracing::warn!(%error, "completion request failed");
                self.completion.in_flight = false;
                self.completion.last_error = Some(error.clone());
                StateChange::Failed(error)
            }
        }
    }
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("theme", &self.theme.theme())
            .field("temperature", &self.temperature)
            .field("video_id", &self.video_id)
            .field("in_flight", &self.completion.in_flight)
            .field("active_generation", &self.active_generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::completion::{CompletionBackend, FragmentStream};
    use crate::theme::{ColorSchemeProbe, ThemeStore};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NullStore;

    impl ThemeStore for NullStore {
        fn load(&self) -> Option<Theme> {
            None
        }

        fn save(&self, _theme: Theme) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct LightProbe;

    impl ColorSchemeProbe for LightProbe {
        fn prefers_dark(&self) -> bool {
            false
        }
    }

    /// Backend whose streams never produce anything; submissions stay
    /// in flight until events are injected by hand.
    struct SilentBackend;

    #[async_trait]
    impl CompletionBackend for SilentBackend {
        async fn stream_completion(
            &self,
            _request: &CompletionRequest,
        ) -> std::result::Result<FragmentStream, CompletionErrorKind> {
            Ok(Box::pin(futures_util::stream::pending()))
        }
    }

    fn studio() -> Studio {
        let theme = ThemeController::resolve(Box::new(NullStore), &LightProbe);
        let (coordinator, _rx) = CompletionCoordinator::new(Arc::new(SilentBackend));
        Studio::new(&StudioConfig::default(), theme, coordinator)
    }

    fn fragment(generation: u64, text: &str) -> CompletionEvent {
        CompletionEvent::Fragment {
            generation,
            text: text.into(),
        }
    }

    // ── Defaults ──────────────────────────────────────────────

    #[tokio::test]
    async fn session_starts_with_spec_defaults() {
        let studio = studio();
        assert!((studio.temperature() - 0.5).abs() < f64::EPSILON);
        assert_eq!(studio.video_id(), None);
        assert_eq!(studio.prompt(), "");
        assert_eq!(studio.completion(), &CompletionState::default());
    }

    // ── Temperature bounds ────────────────────────────────────

    #[tokio::test]
    async fn temperature_stays_within_bounds() {
        let mut studio = studio();
        for value in [-3.0, -0.1, 0.0, 0.3, 0.999, 1.0, 1.5, 42.0] {
            studio.set_temperature(value);
            assert!((0.0..=1.0).contains(&studio.temperature()), "value {value}");
        }
        studio.set_temperature(1.5);
        assert!((studio.temperature() - 1.0).abs() < f64::EPSILON);
        studio.set_temperature(-1.5);
        assert!(studio.temperature().abs() < f64::EPSILON);
    }

    // ── Fragment ordering ─────────────────────────────────────

    #[tokio::test]
    async fn fragments_append_in_arrival_order() {
        let mut studio = studio();
        let generation = studio.submit();

        let mut seen = Vec::new();
        for text in ["Hel", "lo, ", "world"] {
            studio.apply_event(fragment(generation, text));
            seen.push(studio.completion().result_text.clone());
        }

        assert_eq!(seen, vec!["Hel", "Hello, ", "Hello, world"]);
        assert!(studio.completion().in_flight);

        studio.apply_event(CompletionEvent::Finished { generation });
        assert_eq!(studio.completion().result_text, "Hello, world");
        assert!(!studio.completion().in_flight);
    }

    // ── Supersession ──────────────────────────────────────────

    #[tokio::test]
    async fn superseded_fragments_are_dropped() {
        let mut studio = studio();
        let first = studio.submit();
        studio.apply_event(fragment(first, "old-"));

        let second = studio.submit();
        assert!(studio.completion().result_text.is_empty());

        // Late arrivals from the first submission must not apply.
        assert_eq!(
            studio.apply_event(fragment(first, "ghost")),
            StateChange::IgnoredStale
        );
        assert_eq!(
            studio.apply_event(CompletionEvent::Finished { generation: first }),
            StateChange::IgnoredStale
        );
        assert!(studio.completion().in_flight);

        studio.apply_event(fragment(second, "new"));
        studio.apply_event(CompletionEvent::Finished { generation: second });
        assert_eq!(studio.completion().result_text, "new");
        assert!(!studio.completion().in_flight);
    }

    #[tokio::test]
    async fn stale_failure_does_not_clear_in_flight() {
        let mut studio = studio();
        let first = studio.submit();
        let _second = studio.submit();

        let change = studio.apply_event(CompletionEvent::Failed {
            generation: first,
            error: CompletionErrorKind::Timeout,
        });
        assert_eq!(change, StateChange::IgnoredStale);
        assert!(studio.completion().in_flight);
        assert_eq!(studio.completion().last_error, None);
    }

    // ── Failure semantics ─────────────────────────────────────

    #[tokio::test]
    async fn failure_retains_partial_text() {
        let mut studio = studio();
        let generation = studio.submit();

        studio.apply_event(fragment(generation, "Par"));
        studio.apply_event(fragment(generation, "tial"));
        studio.apply_event(CompletionEvent::Failed {
            generation,
            error: CompletionErrorKind::Transport("connection reset".into()),
        });

        assert_eq!(studio.completion().result_text, "Partial");
        assert!(!studio.completion().in_flight);
        assert!(matches!(
            studio.completion().last_error,
            Some(CompletionErrorKind::Transport(_))
        ));
    }

    #[tokio::test]
    async fn resubmission_clears_failure_indicator() {
        let mut studio = studio();
        let generation = studio.submit();
        studio.apply_event(CompletionEvent::Failed {
            generation,
            error: CompletionErrorKind::Http(500),
        });
        assert!(studio.completion().last_error.is_some());

        studio.submit();
        assert_eq!(studio.completion().last_error, None);
        assert!(studio.completion().in_flight);
    }

    // ── Prompt and collaborators ──────────────────────────────

    #[tokio::test]
    async fn template_selection_replaces_prompt_wholesale() {
        let mut studio = studio();
        studio.set_prompt("hand-written prompt");
        studio.on_prompt_selected("Summarize {transcription}");
        assert_eq!(studio.prompt(), "Summarize {transcription}");
    }

    #[tokio::test]
    async fn prompt_replacement_mid_flight_leaves_request_alone() {
        let mut studio = studio();
        studio.set_prompt("original");
        let generation = studio.submit();

        studio.on_prompt_selected("replacement");
        assert_eq!(studio.prompt(), "replacement");

        // The in-flight submission still applies its events normally.
        studio.apply_event(fragment(generation, "out"));
        assert_eq!(studio.completion().result_text, "out");
        assert!(studio.completion().in_flight);
    }

    #[tokio::test]
    async fn upload_callback_sets_video_id() {
        let mut studio = studio();
        studio.on_video_uploaded("vid-42");
        assert_eq!(studio.video_id(), Some("vid-42"));
    }

    // ── In-flight marking ─────────────────────────────────────

    #[tokio::test]
    async fn submit_marks_in_flight_before_any_event() {
        let mut studio = studio();
        assert!(!studio.completion().in_flight);
        studio.submit();
        assert!(studio.completion().in_flight);
    }
}

//! Completion lifecycle events.
//!
//! Every event is tagged with the generation number of the submission that
//! produced it. The state container compares that tag against the most
//! recent submission and drops anything stale, which is what gives
//! last-submission-wins semantics without aborting the older transport.

/// A lifecycle event from an in-flight completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionEvent {
    /// A text fragment arrived. Fragments are emitted in receipt order.
    Fragment {
        /// Generation of the submission that produced this fragment.
        generation: u64,
        /// The decoded text fragment.
        text: String,
    },

    /// The stream completed normally.
    Finished {
        /// Generation of the submission that finished.
        generation: u64,
    },

    /// The request or stream failed. Terminal for that submission.
    Failed {
        /// Generation of the submission that failed.
        generation: u64,
        /// What went wrong.
        error: CompletionErrorKind,
    },
}

impl CompletionEvent {
    /// The generation tag carried by this event.
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Fragment { generation, .. }
            | Self::Finished { generation }
            | Self::Failed { generation, .. } => *generation,
        }
    }

    /// Whether this event terminates its submission.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. } | Self::Failed { .. })
    }
}

/// Why a completion request failed.
///
/// A small closed set so callers can render a failure indicator without
/// parsing messages. Failures are terminal for their submission; there is
/// no automatic retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionErrorKind {
    /// The endpoint answered with a non-success status.
    #[error("completion endpoint returned HTTP {0}")]
    Http(u16),

    /// Connection or mid-stream transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The configured request deadline expired.
    #[error("completion request timed out")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_tag_is_uniform_across_variants() {
        let events = [
            CompletionEvent::Fragment {
                generation: 7,
                text: "hi".into(),
            },
            CompletionEvent::Finished { generation: 7 },
            CompletionEvent::Failed {
                generation: 7,
                error: CompletionErrorKind::Timeout,
            },
        ];
        assert!(events.iter().all(|e| e.generation() == 7));
    }

    #[test]
    fn terminal_classification() {
        assert!(!CompletionEvent::Fragment {
            generation: 1,
            text: String::new(),
        }
        .is_terminal());
        assert!(CompletionEvent::Finished { generation: 1 }.is_terminal());
        assert!(CompletionEvent::Failed {
            generation: 1,
            error: CompletionErrorKind::Http(500),
        }
        .is_terminal());
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(
            CompletionErrorKind::Http(503).to_string(),
            "completion endpoint returned HTTP 503"
        );
        assert_eq!(
            CompletionErrorKind::Transport("connection reset".into()).to_string(),
            "transport error: connection reset"
        );
        assert_eq!(
            CompletionErrorKind::Timeout.to_string(),
            "completion request timed out"
        );
    }
}

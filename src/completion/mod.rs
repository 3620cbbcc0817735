//! Completion request lifecycle: submission, streaming, supersession.
//!
//! The [`CompletionCoordinator`] owns the lifecycle of the single
//! outstanding completion request. Each submission gets a monotonically
//! increasing generation number; the driving task forwards fragments into
//! an event channel tagged with that generation. The state container
//! honors only events whose generation matches the latest submission, so a
//! newer submission supersedes an older one without the transport having
//! to be aborted (dropping the stale stream ends it regardless).
//!
//! # Submodules
//!
//! - [`backend`] — transport trait and the HTTP implementation
//! - [`decoder`] — incremental UTF-8 decoding of streamed chunks
//! - [`events`] — generation-tagged lifecycle events

pub mod backend;
pub mod decoder;
pub mod events;

pub use backend::{CompletionBackend, CompletionRequest, FragmentStream, HttpCompletionBackend};
pub use decoder::Utf8ChunkDecoder;
pub use events::{CompletionErrorKind, CompletionEvent};

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;

/// Owns submission of completion requests and the event channel their
/// streams are driven into.
///
/// One coordinator exists per studio session. Submitting while a request
/// is in flight is allowed; the older request is simply superseded.
pub struct CompletionCoordinator {
    backend: Arc<dyn CompletionBackend>,
    events: mpsc::UnboundedSender<CompletionEvent>,
    generation: u64,
}

impl CompletionCoordinator {
    /// Create a coordinator and the receiving half of its event channel.
    ///
    /// The caller drains the receiver on its single consumer thread and
    /// feeds each event to the state container.
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
    ) -> (Self, mpsc::UnboundedReceiver<CompletionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                backend,
                events,
                generation: 0,
            },
            receiver,
        )
    }

    /// Generation of the most recent submission. Zero before any submit.
    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Submit a completion request, superseding any in-flight one.
    ///
    /// Spawns a task that issues the request and forwards its fragments
    /// into the event channel. Returns the submission's generation so the
    /// caller can filter stale events.
    pub fn submit(&mut self, request: CompletionRequest) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(
            %request_id,
            generation,
            video_id = ?request.video_id,
            temperature = request.temperature,
            "submitting completion request"
        );

        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            drive_stream(backend, request, generation, events).await;
            tracing::debug!(%request_id, generation, "completion request terminated");
        });

        generation
    }
}

impl std::fmt::Debug for CompletionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionCoordinator")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Drive one request's fragment stream into the event channel.
///
/// Stops early when the receiver is gone (session shut down); dropping
/// the stream then also drops the underlying transport.
async fn drive_stream(
    backend: Arc<dyn CompletionBackend>,
    request: CompletionRequest,
    generation: u64,
    events: mpsc::UnboundedSender<CompletionEvent>,
) {
    let mut fragments = match backend.stream_completion(&request).await {
        Ok(stream) => stream,
        Err(error) => {
            let _ = events.send(CompletionEvent::Failed { generation, error });
            return;
        }
    };

    while let Some(item) = fragments.next().await {
        match item {
            Ok(text) => {
                if events
                    .send(CompletionEvent::Fragment { generation, text })
                    .is_err()
                {
                    return;
                }
            }
            Err(error) => {
                let _ = events.send(CompletionEvent::Failed { generation, error });
                return;
            }
        }
    }

    let _ = events.send(CompletionEvent::Finished { generation });
}

//! Transport for the streaming completion endpoint.
//!
//! The backend exposes one operation: issue a completion request and hand
//! back a lazy stream of text fragments. [`HttpCompletionBackend`] is the
//! production implementation (`POST {base}/ai/complete` with a JSON body,
//! response consumed incrementally). The [`CompletionBackend`] trait is the
//! seam that lets lifecycle tests drive scripted fragment sequences with
//! no network.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::Serialize;

use super::decoder::Utf8ChunkDecoder;
use super::events::CompletionErrorKind;
use crate::config::ApiConfig;

/// Path of the completion endpoint, relative to the configured base URL.
pub const COMPLETION_PATH: &str = "/ai/complete";

/// The payload of one completion submission.
///
/// `prompt` is the streaming protocol's own input field; `videoId` and
/// `temperature` ride alongside it. `videoId` serializes as `null` when no
/// upload has completed; submission is not hard-blocked without one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// Full prompt text as edited by the user, captured at submit time.
    pub prompt: String,
    /// Identifier of the uploaded video, when one exists.
    pub video_id: Option<String>,
    /// Generation temperature in \[0.0, 1.0\].
    pub temperature: f64,
}

/// A boxed stream of decoded text fragments.
///
/// Fragments arrive in receipt order. An `Err` item ends the stream.
pub type FragmentStream =
    Pin<Box<dyn Stream<Item = std::result::Result<String, CompletionErrorKind>> + Send>>;

/// Trait for completion transports.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Issue one completion request and return its fragment stream.
    ///
    /// # Errors
    ///
    /// Returns a [`CompletionErrorKind`] when the request cannot be
    /// dispatched or the endpoint answers with a non-success status.
    async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<FragmentStream, CompletionErrorKind>;
}

/// HTTP transport backed by [`reqwest`].
pub struct HttpCompletionBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCompletionBackend {
    /// Build the transport from API configuration.
    ///
    /// The request timeout covers the whole exchange, so a stalled stream
    /// surfaces as [`CompletionErrorKind::Timeout`] mid-stream rather than
    /// hanging forever.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| crate::error::StudioError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn completion_url(&self) -> String {
        format!("{}{}", self.base_url, COMPLETION_PATH)
    }
}

impl std::fmt::Debug for HttpCompletionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCompletionBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionBackend {
    async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<FragmentStream, CompletionErrorKind> {
        let response = self
            .client
            .post(self.completion_url())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionErrorKind::Http(status.as_u16()));
        }

        Ok(Box::pin(fragment_stream(response.bytes_stream())))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> CompletionErrorKind {
    if e.is_timeout() {
        CompletionErrorKind::Timeout
    } else {
        CompletionErrorKind::Transport(e.to_string())
    }
}

struct StreamState {
    bytes: Pin<Box<dyn Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send>>,
    decoder: Utf8ChunkDecoder,
    done: bool,
}

/// Convert a raw byte stream into decoded text fragments.
fn fragment_stream(
    bytes: impl Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send + 'static,
) -> impl Stream<Item = std::result::Result<String, CompletionErrorKind>> + Send {
    futures_util::stream::unfold(
        StreamState {
            bytes: Box::pin(bytes),
            decoder: Utf8ChunkDecoder::new(),
            done: false,
        },
        |mut state| async move {
            if state.done {
                return None;
            }
            loop {
                match state.bytes.next().await {
                    Some(Ok(chunk)) => {
                        let text = state.decoder.push(&chunk);
                        // A chunk ending mid-sequence can decode to nothing.
                        if text.is_empty() {
                            continue;
                        }
                        return Some((Ok(text), state));
                    }
                    Some(Err(e)) => {
                        state.done = true;
                        return Some((Err(map_reqwest_error(e)), state));
                    }
                    None => {
                        state.done = true;
                        if let Some(tail) = state.decoder.flush() {
                            return Some((Ok(tail), state));
                        }
                        return None;
                    }
                }
            }
        },
    )
}

//! Incremental UTF-8 decoding for streamed response bodies.
//!
//! The completion endpoint streams plain text, but the transport delivers
//! arbitrary byte chunks that can split a multi-byte sequence. The decoder
//! carries the incomplete tail between pushes so fragments handed to the
//! state container are always valid UTF-8 and nothing is dropped or
//! reordered at chunk boundaries.

/// Streaming UTF-8 decoder with carry-over between chunks.
///
/// Feed raw chunks via [`push`](Self::push); call [`flush`](Self::flush)
/// once the stream ends to surface any dangling bytes.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, returning the text that is complete so far.
    ///
    /// An incomplete trailing sequence is buffered for the next push.
    /// Invalid bytes in the middle of the input are replaced with
    /// U+FFFD so a corrupt chunk cannot stall the stream.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    if let Ok(text) = std::str::from_utf8(&self.pending[..valid]) {
                        out.push_str(text);
                    }
                    match e.error_len() {
                        // Invalid sequence mid-stream: substitute and continue.
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                        // Incomplete tail: keep it for the next chunk.
                        None => {
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush any bytes still buffered when the stream ends.
    ///
    /// A dangling partial sequence decodes lossily rather than vanishing.
    pub fn flush(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(tail)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.push(b"Hello, world"), "Hello, world");
        assert!(decoder.flush().is_none());
    }

    #[test]
    fn multibyte_split_across_chunks() {
        // "é" is 0xC3 0xA9; split it between two pushes.
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.push(&[0x72, 0xC3]), "r");
        assert_eq!(decoder.push(&[0xA9, 0x73]), "és");
        assert!(decoder.flush().is_none());
    }

    #[test]
    fn four_byte_scalar_split_three_ways() {
        // "🎬" is F0 9F 8E AC.
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.push(&[0xF0]), "");
        assert_eq!(decoder.push(&[0x9F, 0x8E]), "");
        assert_eq!(decoder.push(&[0xAC]), "🎬");
    }

    #[test]
    fn invalid_byte_is_replaced_not_fatal() {
        let mut decoder = Utf8ChunkDecoder::new();
        let out = decoder.push(&[b'a', 0xFF, b'b']);
        assert_eq!(out, "a\u{FFFD}b");
    }

    #[test]
    fn flush_surfaces_dangling_partial_sequence() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.push(&[b'x', 0xC3]), "x");
        let tail = decoder.flush().unwrap();
        assert_eq!(tail, "\u{FFFD}");
        assert!(decoder.flush().is_none());
    }

    #[test]
    fn empty_chunk_yields_empty_text() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.push(b""), "");
    }

    #[test]
    fn concatenation_preserves_arrival_order() {
        let chunks: [&[u8]; 3] = [b"Hel", b"lo, ", b"world"];
        let mut decoder = Utf8ChunkDecoder::new();
        let mut text = String::new();
        for chunk in chunks {
            text.push_str(&decoder.push(chunk));
        }
        assert_eq!(text, "Hello, world");
    }
}

//! Incremental reassembly of streamed chat-completion responses.
//!
//! Providers deliver `data: {json}` frames over a chunked transport, and
//! chunk boundaries fall anywhere, including mid-frame. The accumulator
//! buffers inbound text, slices complete frames off the front, and turns
//! each frame into an event. One accumulator exists per in-flight
//! streaming request.

use serde::Deserialize;

/// End-of-stream marker sent as a frame payload.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Substring the provider emits in a raw chunk when the API key is
/// invalid or expired. Checked before any frame parsing.
pub const INVALID_TOKEN_SENTINEL: &str = "Invalid token";

const FRAME_PREFIX: &str = "data: ";

/// Response structure for streaming chat completions.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// One event produced while scanning the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// A delta arrived; carries the full accumulated text so far.
    Delta(String),
    /// The `[DONE]` terminal marker arrived.
    Done,
    /// A frame failed to decode as JSON. Non-fatal.
    Malformed { detail: String, raw: String },
    /// The invalid-credential sentinel appeared in a raw chunk.
    InvalidToken,
}

/// Buffering state for one streaming translation.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    buffer: String,
    text: String,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Feeds one inbound chunk and returns the events it completed, in
    /// frame-extraction order.
    ///
    /// A chunk containing [`INVALID_TOKEN_SENTINEL`] short-circuits: it is
    /// neither buffered nor scanned, and the single returned event is
    /// [`FrameEvent::InvalidToken`].
    pub fn push_chunk(&mut self, chunk: &str) -> Vec<FrameEvent> {
        if chunk.contains(INVALID_TOKEN_SENTINEL) {
            return vec![FrameEvent::InvalidToken];
        }

        self.buffer.push_str(chunk);

        let mut events = Vec::new();
        while let Some(payload) = self.next_frame() {
            let event = self.handle_payload(&payload);
            let done = matches!(event, Some(FrameEvent::Done));
            if let Some(event) = event {
                events.push(event);
            }
            if done {
                break;
            }
        }
        events
    }

    /// Slices the earliest complete frame off the front of the buffer.
    ///
    /// A frame is `data: ` followed by a payload terminated by a newline.
    /// Anything preceding the frame prefix (SSE comments, blank lines) is
    /// consumed with the frame. Partial frames stay buffered.
    fn next_frame(&mut self) -> Option<String> {
        let start = self.buffer.find(FRAME_PREFIX)?;
        let payload_start = start + FRAME_PREFIX.len();
        let newline = self.buffer[payload_start..].find('\n')? + payload_start;

        let payload = self.buffer[payload_start..newline].trim().to_string();
        self.buffer.drain(..=newline);
        Some(payload)
    }

    /// Decodes one frame payload into an event.
    ///
    /// The `[DONE]` sentinel terminates the stream; empty deltas produce
    /// no event; decode failures are reported but do not abort.
    fn handle_payload(&mut self, payload: &str) -> Option<FrameEvent> {
        if payload == DONE_SENTINEL {
            return Some(FrameEvent::Done);
        }

        match serde_json::from_str::<StreamResponse>(payload) {
            Ok(response) => {
                let delta = response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.delta.content)
                    .unwrap_or_default();
                if delta.is_empty() {
                    None
                } else {
                    self.text.push_str(&delta);
                    Some(FrameEvent::Delta(self.text.clone()))
                }
            }
            Err(err) => Some(FrameEvent::Malformed {
                detail: err.to_string(),
                raw: payload.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn delta_frame(content: &str) -> String {
        format!("data: {{\"choices\":[{{\"delta\":{{\"content\":\"{content}\"}}}}]}}\n")
    }

    #[test]
    fn test_deltas_accumulate_across_chunks() {
        let mut acc = StreamAccumulator::new();

        assert_eq!(
            acc.push_chunk(&delta_frame("A")),
            vec![FrameEvent::Delta("A".to_string())]
        );
        assert_eq!(
            acc.push_chunk(&delta_frame("B")),
            vec![FrameEvent::Delta("AB".to_string())]
        );
        assert_eq!(acc.push_chunk("data: [DONE]\n"), vec![FrameEvent::Done]);
        assert_eq!(acc.text(), "AB");
    }

    #[test]
    fn test_chunk_split_mid_frame() {
        let mut acc = StreamAccumulator::new();

        assert_eq!(acc.push_chunk("data: {\"choi"), vec![]);
        assert_eq!(
            acc.push_chunk("ces\":[{\"delta\":{\"content\":\"Hello\"}}]}\n"),
            vec![FrameEvent::Delta("Hello".to_string())]
        );
    }

    #[test]
    fn test_multiple_frames_in_one_chunk_emit_in_order() {
        let mut acc = StreamAccumulator::new();
        let chunk = format!("{}{}", delta_frame("A"), delta_frame("B"));

        assert_eq!(
            acc.push_chunk(&chunk),
            vec![
                FrameEvent::Delta("A".to_string()),
                FrameEvent::Delta("AB".to_string()),
            ]
        );
    }

    #[test]
    fn test_frame_without_trailing_newline_stays_buffered() {
        let mut acc = StreamAccumulator::new();
        let frame = delta_frame("A");

        assert_eq!(acc.push_chunk(frame.trim_end()), vec![]);
        assert_eq!(
            acc.push_chunk("\n"),
            vec![FrameEvent::Delta("A".to_string())]
        );
    }

    #[test]
    fn test_empty_delta_emits_nothing() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(acc.push_chunk(&delta_frame("")), vec![]);
        assert_eq!(acc.push_chunk("data: {\"choices\":[{\"delta\":{}}]}\n"), vec![]);
    }

    #[test]
    fn test_malformed_frame_is_non_fatal() {
        let mut acc = StreamAccumulator::new();
        let chunk = format!("data: not json\n{}", delta_frame("A"));

        let events = acc.push_chunk(&chunk);
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], FrameEvent::Malformed { raw, .. } if raw == "not json"));
        assert_eq!(events[1], FrameEvent::Delta("A".to_string()));
    }

    #[test]
    fn test_invalid_token_sentinel_short_circuits() {
        let mut acc = StreamAccumulator::new();
        acc.push_chunk(&delta_frame("A"));

        let chunk = format!("{}Invalid token{}", delta_frame("B"), delta_frame("C"));
        assert_eq!(acc.push_chunk(&chunk), vec![FrameEvent::InvalidToken]);

        // Nothing from that chunk was processed or buffered.
        assert_eq!(acc.text(), "A");
        assert_eq!(acc.push_chunk("data: [DONE]\n"), vec![FrameEvent::Done]);
    }

    #[test]
    fn test_junk_before_frame_is_consumed() {
        let mut acc = StreamAccumulator::new();
        let chunk = format!(": keep-alive\n\n{}", delta_frame("A"));

        assert_eq!(
            acc.push_chunk(&chunk),
            vec![FrameEvent::Delta("A".to_string())]
        );
    }

    #[test]
    fn test_multi_line_frame_is_reported_not_stalled() {
        // A provider emitting pretty-printed JSON inside a frame breaks
        // the one-line-per-frame convention; the scanner reports it and
        // keeps going instead of buffering forever.
        let mut acc = StreamAccumulator::new();
        let events = acc.push_chunk("data: {\n\"choices\": []\n}\n");

        assert!(matches!(events[0], FrameEvent::Malformed { .. }));
        let events = acc.push_chunk(&delta_frame("A"));
        assert_eq!(*events.last().unwrap(), FrameEvent::Delta("A".to_string()));
    }

    #[test]
    fn test_only_first_choice_delta_is_used() {
        let mut acc = StreamAccumulator::new();
        let chunk = "data: {\"choices\":[{\"delta\":{\"content\":\"A\"}},{\"delta\":{\"content\":\"B\"}}]}\n";

        assert_eq!(
            acc.push_chunk(chunk),
            vec![FrameEvent::Delta("A".to_string())]
        );
        assert_eq!(acc.text(), "A");
    }

    #[test]
    fn test_unicode_delta() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(
            acc.push_chunk(&delta_frame("你好")),
            vec![FrameEvent::Delta("你好".to_string())]
        );
    }
}

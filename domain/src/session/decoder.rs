//! Incremental decoder for the chat response body.
//!
//! The body is a sequence of newline-separated records. Records of interest
//! start with [`DATA_PREFIX`]; their payload is either the [`DONE_MARKER`],
//! an [`ERROR_MARKER`]-prefixed failure message, or a literal text delta.
//! Anything else (blank lines, keep-alives, comments) is ignored.
//!
//! Bytes are buffered until a full record is available. Records are split on
//! the `\n` byte, which never occurs inside a multi-byte UTF-8 sequence, so
//! the produced [`StreamChunk`]s do not depend on how the caller happened to
//! split the body into buffers.

use super::stream::StreamChunk;

/// Prefix of records that carry a payload.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that ends the stream successfully.
pub const DONE_MARKER: &str = "[DONE]";

/// Payload prefix that ends the stream with a failure message.
pub const ERROR_MARKER: &str = "[ERROR]";

/// Stateful decoder turning byte buffers into [`StreamChunk`]s.
///
/// Once a terminal chunk ([`StreamChunk::Done`] or [`StreamChunk::Error`])
/// has been produced, or [`finish`](Self::finish) has been called, the
/// decoder ignores all further input.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    pending: Vec<u8>,
    finished: bool,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once no further chunks can be produced.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed the next buffer and return the chunks of every record it completes.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamChunk> {
        let mut chunks = Vec::new();
        if self.finished {
            return chunks;
        }

        self.pending.extend_from_slice(bytes);

        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            let decoded = decode_record(&self.pending[start..end]);
            start = end + 1;

            if let Some(chunk) = decoded {
                let terminal = chunk.is_terminal();
                chunks.push(chunk);
                if terminal {
                    self.finished = true;
                    self.pending.clear();
                    return chunks;
                }
            }
        }

        self.pending.drain(..start);
        chunks
    }

    /// Signal end of input.
    ///
    /// A trailing record without a final newline is still decoded. Bytes that
    /// do not form valid UTF-8 at this point are replaced rather than
    /// rejected.
    pub fn finish(&mut self) -> Vec<StreamChunk> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;

        let rest = std::mem::take(&mut self.pending);
        decode_record(&rest).into_iter().collect()
    }
}

/// Decode one record (without its trailing `\n`).
fn decode_record(raw: &[u8]) -> Option<StreamChunk> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = String::from_utf8_lossy(raw);
    let payload = line.strip_prefix(DATA_PREFIX)?;

    if payload == DONE_MARKER {
        return Some(StreamChunk::Done);
    }

    if let Some(message) = payload.strip_prefix(ERROR_MARKER) {
        let message = message.strip_prefix(' ').unwrap_or(message);
        return Some(StreamChunk::Error(message.to_string()));
    }

    Some(StreamChunk::TextDelta(payload.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all<'a>(buffers: impl IntoIterator<Item = &'a [u8]>) -> Vec<StreamChunk> {
        let mut decoder = StreamDecoder::new();
        let mut chunks = Vec::new();
        for buffer in buffers {
            chunks.extend(decoder.feed(buffer));
        }
        chunks.extend(decoder.finish());
        chunks
    }

    fn delta(s: &str) -> StreamChunk {
        StreamChunk::TextDelta(s.to_string())
    }

    #[test]
    fn decodes_deltas_and_done() {
        let body = b"data: Hi\n\ndata:  there\n\ndata: [DONE]\n\n";
        assert_eq!(
            decode_all([&body[..]]),
            vec![delta("Hi"), delta(" there"), StreamChunk::Done]
        );
    }

    #[test]
    fn payload_is_verbatim_not_json() {
        let body = br#"data: {"text": "raw \n"}"#;
        assert_eq!(decode_all([&body[..]]), vec![delta(r#"{"text": "raw \n"}"#)]);
    }

    #[test]
    fn error_marker_ends_stream_with_message() {
        let body = b"data: partial\ndata: [ERROR] rate limited\ndata: ignored\n";
        assert_eq!(
            decode_all([&body[..]]),
            vec![
                delta("partial"),
                StreamChunk::Error("rate limited".to_string())
            ]
        );
    }

    #[test]
    fn error_marker_without_space() {
        let body = b"data: [ERROR]boom\n";
        assert_eq!(
            decode_all([&body[..]]),
            vec![StreamChunk::Error("boom".to_string())]
        );
    }

    #[test]
    fn non_data_lines_are_ignored() {
        let body = b": keep-alive\n\nevent: message\nid: 7\ndata: ok\nretry: 100\n";
        assert_eq!(decode_all([&body[..]]), vec![delta("ok")]);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let body = b"data: a\r\n\r\ndata: [DONE]\r\n";
        assert_eq!(decode_all([&body[..]]), vec![delta("a"), StreamChunk::Done]);
    }

    #[test]
    fn nothing_after_done_even_with_more_input() {
        let mut decoder = StreamDecoder::new();
        let first = decoder.feed(b"data: x\ndata: [DONE]\ndata: y\n");
        assert_eq!(first, vec![delta("x"), StreamChunk::Done]);
        assert!(decoder.is_finished());
        assert!(decoder.feed(b"data: z\n").is_empty());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn incomplete_record_waits_for_newline() {
        let mut decoder = StreamDecoder::new();
        assert!(decoder.feed(b"data: hel").is_empty());
        assert_eq!(decoder.feed(b"lo\n"), vec![delta("hello")]);
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn trailing_record_without_newline_is_flushed_on_finish() {
        let mut decoder = StreamDecoder::new();
        assert!(decoder.feed(b"data: tail").is_empty());
        assert_eq!(decoder.finish(), vec![delta("tail")]);
        assert!(decoder.is_finished());
    }

    #[test]
    fn end_without_terminal_event_yields_only_deltas() {
        let body = b"data: a\ndata: b\n";
        assert_eq!(decode_all([&body[..]]), vec![delta("a"), delta("b")]);
    }

    #[test]
    fn split_inside_multibyte_character() {
        let body = "data: こんにちは\n".as_bytes();
        // Split inside the second character's 3-byte sequence.
        let (a, b) = body.split_at(DATA_PREFIX.len() + 4);
        assert_eq!(decode_all([a, b]), vec![delta("こんにちは")]);
    }

    #[test]
    fn split_boundary_invariance_over_every_split_point() {
        let body = "data: héllo wörld\n\ndata: 日本語🙂\n: ping\ndata: [ERROR] 失敗\n".as_bytes();
        let expected = decode_all([body]);
        assert_eq!(
            expected,
            vec![
                delta("héllo wörld"),
                delta("日本語🙂"),
                StreamChunk::Error("失敗".to_string()),
            ]
        );

        for i in 0..=body.len() {
            let (a, b) = body.split_at(i);
            assert_eq!(decode_all([a, b]), expected, "split at {i}");
        }

        for i in 0..=body.len() {
            for j in i..=body.len() {
                let parts = [&body[..i], &body[i..j], &body[j..]];
                assert_eq!(decode_all(parts), expected, "split at {i},{j}");
            }
        }
    }

    #[test]
    fn byte_at_a_time_matches_single_buffer() {
        let body = "data: Ωmega\ndata: [DONE]\n".as_bytes();
        let one_by_one: Vec<&[u8]> = body.chunks(1).collect();
        assert_eq!(decode_all(one_by_one), decode_all([body]));
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let body = b"data: ok\xff\n";
        assert_eq!(decode_all([&body[..]]), vec![delta("ok\u{fffd}")]);
    }
}

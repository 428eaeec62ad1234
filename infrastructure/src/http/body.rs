//! Response body decoding.

use chatline_application::{DeltaStream, TransportError};
use chatline_domain::{StreamChunk, StreamDecoder};
use futures::{Stream, StreamExt};
use std::fmt::Display;
use tracing::debug;

/// Turn a response byte stream into a stream of text deltas.
///
/// Ends after the done marker, after an error event (yielded as
/// [`TransportError::Stream`]), or when the body ends without either.
pub(crate) fn decode_body<S, B, E>(bytes: S) -> DeltaStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut decoder = StreamDecoder::new();
        let mut bytes = std::pin::pin!(bytes);

        loop {
            let chunks = match bytes.next().await {
                Some(Ok(buffer)) => decoder.feed(buffer.as_ref()),
                Some(Err(e)) => {
                    yield Err(TransportError::Connection(format!("stream read error: {e}")));
                    return;
                }
                None => {
                    debug!("Response body ended without a done marker");
                    decoder.finish()
                }
            };

            for chunk in chunks {
                match chunk {
                    StreamChunk::TextDelta(text) => yield Ok(text),
                    StreamChunk::Error(message) => {
                        yield Err(TransportError::Stream(message));
                        return;
                    }
                    StreamChunk::Done => return,
                }
            }

            if decoder.is_finished() {
                return;
            }
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(buffers: Vec<Result<&'static [u8], String>>) -> Vec<Result<String, TransportError>> {
        decode_body(futures::stream::iter(buffers)).collect().await
    }

    fn ok(s: &'static str) -> Result<&'static [u8], String> {
        Ok(s.as_bytes())
    }

    #[tokio::test]
    async fn deltas_until_done() {
        let items = collect(vec![
            ok("data: Hi\n\nda"),
            ok("ta:  there\n\ndata: [DONE]\n\ndata: late\n"),
        ])
        .await;
        assert_eq!(items, vec![Ok("Hi".to_string()), Ok(" there".to_string())]);
    }

    #[tokio::test]
    async fn error_event_ends_stream_with_error() {
        let items = collect(vec![ok("data: a\ndata: [ERROR] rate limited\ndata: b\n")]).await;
        assert_eq!(
            items,
            vec![
                Ok("a".to_string()),
                Err(TransportError::Stream("rate limited".to_string()))
            ]
        );
    }

    #[tokio::test]
    async fn body_end_without_marker_flushes_trailing_record() {
        let items = collect(vec![ok("data: a\ndata: tail")]).await;
        assert_eq!(items, vec![Ok("a".to_string()), Ok("tail".to_string())]);
    }

    #[tokio::test]
    async fn read_error_is_a_connection_failure() {
        let items = collect(vec![ok("data: a\n"), Err("reset".to_string())]).await;
        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Err(TransportError::Connection(_))));
    }

    #[tokio::test]
    async fn multibyte_split_across_buffers() {
        let (a, b) = "data: 日本\n".as_bytes().split_at(8);
        let items = collect(vec![Ok(a), Ok(b)]).await;
        assert_eq!(items, vec![Ok("日本".to_string())]);
    }
}

//! Newline-delimited JSON event source.
//!
//! Each line holds one `InboundEvent`:
//!
//! ```text
//! {"type":"message","user_id":42,"text":"/start"}
//! {"type":"callback","user_id":42,"data":"consent:accept"}
//! ```

use async_trait::async_trait;
use shared_types::InboundEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, warn};

/// Supplies inbound events until the transport closes.
#[async_trait]
pub trait EventSource: Send {
    /// Next event, or `None` once the source is exhausted.
    /// Must be cancel safe: the event loop races it against shutdown.
    async fn next_event(&mut self) -> Option<InboundEvent>;
}

/// Reads one JSON event per line. Blank lines are ignored, malformed lines
/// are logged and skipped.
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line_no: usize,
    rejected: usize,
}

impl JsonLinesSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> JsonLinesSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            rejected: 0,
        }
    }

    /// Lines that did not parse.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

#[async_trait]
impl<R> EventSource for JsonLinesSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_event(&mut self) -> Option<InboundEvent> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    warn!(error = %e, "[gw] Event source read failed, closing");
                    return None;
                }
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<InboundEvent>(trimmed) {
                Ok(event) => {
                    debug!(line = self.line_no, user_id = event.user_id(), "[gw] Event read");
                    return Some(event);
                }
                Err(e) => {
                    self.rejected += 1;
                    warn!(line = self.line_no, error = %e, "[gw] Skipping malformed event");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::EventKind;

    #[tokio::test]
    async fn test_reads_events_and_skips_garbage() {
        let input: &[u8] = br#"{"type":"message","user_id":42,"text":"/start"}

not json
{"type":"unknown","user_id":1}
{"type":"callback","user_id":42,"data":"consent:accept"}
"#;
        let mut source = JsonLinesSource::new(input);

        let first = source.next_event().await.unwrap();
        assert_eq!(first.kind(), EventKind::Message);
        assert_eq!(first.payload(), Some("/start"));

        let second = source.next_event().await.unwrap();
        assert_eq!(second.kind(), EventKind::Callback);
        assert_eq!(second.user_id(), 42);

        assert!(source.next_event().await.is_none());
        assert_eq!(source.rejected(), 2);
    }

    #[tokio::test]
    async fn test_profile_fields_are_optional() {
        let input: &[u8] =
            br#"{"type":"message","user_id":7,"profile":{"username":"ann"}}"#;
        let mut source = JsonLinesSource::new(input);

        let event = source.next_event().await.unwrap();
        assert_eq!(event.profile().username.as_deref(), Some("ann"));
        assert_eq!(event.payload(), None);
    }
}

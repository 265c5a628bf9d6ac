//! Push-event source: newline-delimited JSON events read from any async
//! reader (stdin, a socket, a replay file) and forwarded as [`Message`]s.

use agro_core::{DashError, Message, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Reason reported when the reader reaches end of input.
pub const END_OF_STREAM: &str = "end of stream";

/// Decode one event line.
pub fn parse_line(line: &str) -> Result<Message> {
    serde_json::from_str(line.trim()).map_err(DashError::from)
}

/// Spawn a background Tokio task that reads events from `reader` and
/// forwards them through the returned channel.
///
/// Blank lines are skipped and undecodable lines are logged and skipped.
/// At end of input a final `Disconnected` is sent. The task stops early
/// when the receiver is dropped.
pub fn spawn_feed<R>(reader: R, buffer: usize) -> mpsc::Receiver<Message>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(buffer.max(1));

    tokio::spawn(async move {
        if let Err(e) = feed_loop(reader, &tx).await {
            warn!("Feed stopped: {e}");
            let _ = tx.send(Message::ConnectError(e.to_string())).await;
        }
    });

    rx
}

async fn feed_loop<R>(reader: R, tx: &mpsc::Sender<Message>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut segments = reader.split(b'\n');
    let mut line_no = 0usize;

    while let Some(raw) = segments.next_segment().await? {
        line_no += 1;
        let Ok(line) = std::str::from_utf8(&raw) else {
            warn!(line = line_no, "Skipping event that is not valid UTF-8");
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }

        let message = match parse_line(line) {
            Ok(m) => m,
            Err(e) => {
                warn!(line = line_no, "Skipping undecodable event: {e}");
                continue;
            }
        };

        debug!(line = line_no, ?message, "event");
        if tx.send(message).await.is_err() {
            return Ok(()); // receiver dropped
        }
    }

    let _ = tx.send(Message::Disconnected(END_OF_STREAM.to_string())).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn collect(input: &'static [u8]) -> Vec<Message> {
        let mut rx = spawn_feed(BufReader::new(input), 4);
        let mut out = Vec::new();
        while let Some(m) = rx.recv().await {
            out.push(m);
        }
        out
    }

    #[test]
    fn parse_line_reports_decode_errors() {
        assert!(matches!(parse_line("{not json"), Err(DashError::Decode { .. })));
        assert_eq!(parse_line(r#"  {"event":"connect"}  "#).unwrap(), Message::Connected);
    }

    #[tokio::test]
    async fn forwards_events_in_order() {
        let msgs = collect(concat!(
            "{\"event\":\"connect\"}\n",
            "{\"event\":\"gateway_ip\",\"data\":{\"ip\":\"gw\"}}\n",
        )
        .as_bytes())
        .await;

        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0], Message::Connected);
        assert!(matches!(msgs[1], Message::GatewayIp(_)));
        assert_eq!(msgs[2], Message::Disconnected(END_OF_STREAM.into()));
    }

    #[tokio::test]
    async fn skips_blank_and_bad_lines() {
        let msgs = collect(concat!(
            "\n",
            "garbage\n",
            "{\"event\":\"unknown_event\"}\n",
            "{\"event\":\"nuevo_dato\",\"data\":{\"temperatura\":20}}\n",
        )
        .as_bytes())
        .await;

        assert_eq!(msgs.len(), 2);
        assert!(matches!(msgs[0], Message::NewSample(_)));
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_the_feed() {
        let msgs = collect(
            b"{\"event\":\"connect\"}\n\xff\xfe garbage\n{\"event\":\"nuevo_dato\",\"data\":{\"id\":1}}\r\n",
        )
        .await;

        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0], Message::Connected);
        assert!(matches!(msgs[1], Message::NewSample(_)));
        assert_eq!(msgs[2], Message::Disconnected(END_OF_STREAM.into()));
    }
}

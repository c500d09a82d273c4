//! Reads one JSON message per line from stdin, decodes it, and prints the
//! canonical encoding to stdout. Rejected lines are logged and skipped.
//!
//! ```text
//! $ echo '{"roomId":"abc","type":"ROOM_CREATED","x":1}' | RUST_LOG=debug wire-inspect
//! {"type":"ROOM_CREATED","roomId":"abc"}
//! ```

use cardchat_protocol::{Codec, JsonCodec, Message, ProtocolError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt};

/// Decodes a single line and returns it re-encoded.
fn inspect(codec: &JsonCodec, line: &str) -> Result<(Message, String), ProtocolError> {
    let message = codec.decode(line.trim().as_bytes())?;
    let encoded = codec.encode(&message)?;
    // serde_json only ever emits UTF-8.
    let text = String::from_utf8_lossy(&encoded).into_owned();
    Ok((message, text))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    accepted: usize,
    rejected: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let codec = JsonCodec::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut tally = Tally::default();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        match inspect(&codec, &line) {
            Ok((message, text)) => {
                tally.accepted += 1;
                tracing::info!(
                    line = line_no,
                    kind = %message.kind(),
                    direction = ?message.direction(),
                    "accepted"
                );
                stdout.write_all(text.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            Err(e) => {
                tally.rejected += 1;
                tracing::warn!(line = line_no, error = %e, "rejected");
            }
        }
    }

    stdout.flush().await?;
    tracing::info!(accepted = tally.accepted, rejected = tally.rejected, "done");
    Ok(())
}

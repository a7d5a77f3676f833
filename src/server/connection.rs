//! Per-client connection handling
//!
//! Reads newline-framed commands, executes them against the cache and writes
//! one reply line per command.

use std::net::SocketAddr;

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::error::ProtocolError;
use crate::protocol::{handle_line, Reply};

/// Serves one client until it disconnects, errors or `shutdown` fires.
///
/// Failures here only end this connection; the shared cache is never left
/// half-updated because every command is a single atomic cache operation.
pub async fn serve_connection<S>(
    stream: S,
    peer: SocketAddr,
    cache: &Cache,
    max_line_length: usize,
    shutdown: CancellationToken,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    // Framed on raw bytes so a line that is not UTF-8 can be answered, not fatal
    let codec =
        AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), max_line_length);
    let mut lines = FramedRead::new(reader, codec);
    // The framed reader yields one `None` right after a decode error before resuming
    let mut after_error = false;

    loop {
        let next = tokio::select! {
            _ = shutdown.cancelled() => {
                debug!(%peer, "closing connection for shutdown");
                break;
            }
            next = lines.next() => next,
        };

        let reply = match next {
            Some(Ok(raw)) => {
                after_error = false;
                let raw = raw.strip_suffix(b"\r").unwrap_or(&raw[..]);
                match std::str::from_utf8(raw) {
                    Ok(line) => match handle_line(cache, line) {
                        Some(reply) => reply,
                        None => continue,
                    },
                    Err(err) => {
                        debug!(%peer, "rejecting non utf-8 line: {}", err);
                        Reply::Error(ProtocolError::InvalidEncoding)
                    }
                }
            }
            Some(Err(AnyDelimiterCodecError::MaxChunkLengthExceeded)) => {
                after_error = true;
                debug!(%peer, max_line_length, "discarding over-long line");
                Reply::Error(ProtocolError::LineTooLong)
            }
            Some(Err(AnyDelimiterCodecError::Io(err))) => {
                warn!(%peer, "read error: {}", err);
                break;
            }
            None if after_error => {
                after_error = false;
                continue;
            }
            None => break,
        };

        if let Err(err) = writer.write_all(reply.to_line().as_bytes()).await {
            warn!(%peer, "write error: {}", err);
            break;
        }
    }

    let _ = writer.shutdown().await;
    debug!(%peer, "client disconnected");
}

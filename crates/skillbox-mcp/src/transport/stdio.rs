//! Stdio transport: reads JSON-RPC from stdin, writes to stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::McpResult;

use super::framing;

/// Line-oriented session loop for desktop MCP clients.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &ProtocolHandler {
        &self.handler
    }

    /// Run the transport loop: reads from stdin, writes to stdout.
    pub async fn run(&self) -> McpResult<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        self.serve(stdin, &mut stdout).await
    }

    /// Serve one session over an arbitrary byte stream until end of input.
    ///
    /// Each line is fully dispatched and its reply written and flushed before
    /// the next line is read. Lines that fail to decode are skipped.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        tracing::info!("Stdio transport started");

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf).await?;

            if bytes_read == 0 {
                tracing::info!("EOF on input, shutting down");
                break;
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Skipping line that is not valid UTF-8: {e}");
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match process_line(&self.handler, line) {
                Ok(Some(framed)) => {
                    writer.write_all(framed.as_bytes()).await?;
                    writer.flush().await?;
                }
                Ok(None) => {}
                Err(e) => tracing::error!("Failed to encode reply: {e}"),
            }
        }

        Ok(())
    }
}

/// Decode one line, dispatch it, and return the framed reply, if any.
///
/// A line that does not decode yields `Ok(None)`: there is no `id` to answer.
pub fn process_line(handler: &ProtocolHandler, line: &str) -> McpResult<Option<String>> {
    let request = match framing::parse_message(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Skipping undecodable line: {e}");
            return Ok(None);
        }
    };

    match handler.handle_request(request) {
        Some(reply) => framing::frame_message(&reply).map(Some),
        None => Ok(None),
    }
}

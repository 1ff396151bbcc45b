//! Newline-delimited JSON framing for MCP over stdio.
//!
//! Each message is one line of JSON. [`LineReader`] hands back raw bytes so the
//! server can answer unparseable input, invalid UTF-8 included, with a JSON-RPC
//! parse error instead of dropping the connection.

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Maximum frame size (4 MiB) to prevent unbounded memory allocation.
pub const MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;

pub struct LineReader<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read the next non-blank line, trimmed and without its terminator.
    ///
    /// Returns `Ok(None)` on EOF (clean shutdown).
    pub async fn read_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        loop {
            line.clear();
            let bytes_read = (&mut self.reader)
                .take(MAX_FRAME_BYTES as u64 + 1)
                .read_until(b'\n', &mut line)
                .await
                .context("reading frame")?;

            if bytes_read == 0 {
                return Ok(None);
            }
            if bytes_read > MAX_FRAME_BYTES {
                bail!("frame exceeds maximum {MAX_FRAME_BYTES} bytes");
            }

            let trimmed = line.trim_ascii();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_vec()));
            }
        }
    }
}

pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn write_frame<T: serde::Serialize>(&mut self, msg: &T) -> Result<()> {
        let mut body = serde_json::to_string(msg).context("serializing frame")?;
        body.push('\n');

        self.writer
            .write_all(body.as_bytes())
            .await
            .context("writing frame")?;
        self.writer.flush().await.context("flushing frame")?;

        Ok(())
    }
}

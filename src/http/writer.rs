use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{FileBody, Response};

/// Renders the status line, header lines and blank line of a response.
///
/// Pure: the same response always produces the same bytes.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        resp.version.as_str(),
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers, verbatim and in order
    for line in &resp.headers {
        buf.extend_from_slice(line.as_bytes());
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response to a stream: the head, then the file body if any.
pub struct ResponseWriter {
    head: Vec<u8>,
    written: usize,
    body: Option<FileBody>,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        let head = serialize_head(&response);
        Self {
            head,
            written: 0,
            body: response.body,
        }
    }

    /// Bytes the full response will occupy on the wire.
    pub fn total_len(&self) -> u64 {
        self.head.len() as u64 + self.body.as_ref().map_or(0, |b| b.len)
    }

    /// Writes whatever has not been written yet.
    ///
    /// The body file is taken out of the writer before copying, so it is
    /// sent at most once and closed when the copy finishes or fails.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.head.len() {
            let n = stream.write(&self.head[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        if let Some(FileBody { file, len }) = self.body.take() {
            let mut limited = file.take(len);
            let copied = tokio::io::copy(&mut limited, stream).await?;

            if copied != len {
                return Err(anyhow::anyhow!(
                    "file shrank while sending: expected {} bytes, sent {}",
                    len,
                    copied
                ));
            }
        }

        stream.flush().await?;
        Ok(())
    }
}

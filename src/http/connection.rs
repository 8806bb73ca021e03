use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use crate::http::parser::{find_headers_end, parse_http_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::static_files::{BuildError, StaticFiles};
use crate::http::writer::ResponseWriter;

/// Deadlines and limits for one connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    /// Deadline for the whole header block, measured from the first read.
    pub read_timeout: Duration,
    /// Header blocks longer than this are answered with 400.
    pub max_header_bytes: usize,
    /// Deadline for writing the whole response, file body included.
    pub write_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(30),
            max_header_bytes: 8192,
            write_timeout: Duration::from_secs(30),
        }
    }
}

/// One accepted client, served exactly one request/response exchange.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    scanned: usize,
    state: ConnectionState,
    files: Arc<StaticFiles>,
    settings: ConnectionSettings,
}

pub enum ConnectionState {
    AwaitingHeaders,
    Parsing(Bytes),
    Building(Request),
    Responding(ResponseWriter),
    Closed,
}

enum HeaderBlock {
    Complete(Bytes),
    TooLarge,
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, files: Arc<StaticFiles>, settings: ConnectionSettings) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            scanned: 0,
            state: ConnectionState::AwaitingHeaders,
            files,
            settings,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingHeaders => {
                    self.state = match self.read_header_block().await? {
                        HeaderBlock::Complete(block) => ConnectionState::Parsing(block),
                        HeaderBlock::TooLarge => {
                            warn!(
                                limit = self.settings.max_header_bytes,
                                buffered = self.buffer.len(),
                                "Header block too large"
                            );
                            ConnectionState::Responding(ResponseWriter::new(Response::bad_request()))
                        }
                        HeaderBlock::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Parsing(block) => {
                    self.state = match parse_http_request(&block) {
                        Ok(req) => {
                            debug!(
                                method = req.method.as_str(),
                                uri = %req.uri,
                                version = req.version.as_str(),
                                "Request parsed"
                            );
                            ConnectionState::Building(req)
                        }
                        Err(e) => {
                            info!(error = %e, status = e.status().as_u16(), "Request rejected");
                            let response = Response::default_for(e.status());
                            ConnectionState::Responding(ResponseWriter::new(response))
                        }
                    };
                }

                ConnectionState::Building(req) => {
                    let response = match self.files.build_response(&req).await {
                        Ok(response) => response,
                        Err(e @ BuildError::Internal(_)) => {
                            tracing::error!(uri = %req.uri, error = %e, "Failed to build response");
                            Response::internal_error()
                        }
                        Err(e) => Response::default_for(e.status()),
                    };

                    info!(
                        method = req.method.as_str(),
                        uri = %req.uri,
                        status = response.status.as_u16(),
                        "Request served"
                    );
                    self.state = ConnectionState::Responding(ResponseWriter::new(response));
                }

                ConnectionState::Responding(mut writer) => {
                    debug!(bytes = writer.total_len(), "Writing response");
                    let deadline = Instant::now() + self.settings.write_timeout;

                    match timeout_at(deadline, writer.write_to_stream(&mut self.stream)).await {
                        Ok(written) => {
                            written?;
                            if let Err(e) = self.stream.shutdown().await {
                                debug!(error = %e, "Shutdown after response failed");
                            }
                        }
                        // Dropping the writer here closes the body file.
                        Err(_) => warn!("Timed out writing response"),
                    }
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_header_block(&mut self) -> anyhow::Result<HeaderBlock> {
        let deadline = Instant::now() + self.settings.read_timeout;

        loop {
            if let Some(end) = find_headers_end(&self.buffer, self.scanned) {
                if end > self.settings.max_header_bytes {
                    return Ok(HeaderBlock::TooLarge);
                }
                // Anything after the block (a body, a pipelined request) is ignored.
                let block = self.buffer.split_to(end).freeze();
                return Ok(HeaderBlock::Complete(block));
            }
            self.scanned = self.buffer.len();

            if self.buffer.len() > self.settings.max_header_bytes {
                return Ok(HeaderBlock::TooLarge);
            }

            let n = match timeout_at(deadline, self.stream.read_buf(&mut self.buffer)).await {
                Ok(read) => read.context("failed to read request headers")?,
                Err(_) => {
                    warn!(buffered = self.buffer.len(), "Timed out waiting for request headers");
                    return Ok(HeaderBlock::Closed);
                }
            };

            if n == 0 {
                // Client closed connection
                if !self.buffer.is_empty() {
                    debug!(buffered = self.buffer.len(), "Client closed before end of headers");
                }
                return Ok(HeaderBlock::Closed);
            }
        }
    }
}

//! HTTP/1.x protocol engine.
//!
//! Each client connection is served one request and then closed.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine driving the steps below
//! - **`parser`**: Turns a raw header block into a [`request::Request`]
//! - **`request`**: Method, version and request representation
//! - **`header`**: Ordered list of raw header lines
//! - **`static_files`**: Resolves a request against the document root
//! - **`response`**: Status codes and the response type with its builder
//! - **`writer`**: Serializes a response and copies the file body out
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingHeaders  │ ← Buffer input until CRLFCRLF
//!        └──────┬───────────┘
//!               │ Header block complete     (EOF / timeout → Closed,
//!               ▼                            too large → 400)
//!        ┌──────────────────┐
//!        │    Parsing       │ ← Request line → Request
//!        └──────┬───────────┘
//!               │ Request parsed            (error → 400 / 405 / 500)
//!               ▼
//!        ┌──────────────────┐
//!        │    Building      │ ← Resolve and open the file
//!        └──────┬───────────┘
//!               │ Response ready            (error → 403 / 404 / 500)
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← Head, then file bytes
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use filament::http::connection::{Connection, ConnectionSettings};
//! use filament::http::static_files::StaticFiles;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let files = Arc::new(StaticFiles::new("./public", "index.html"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let files = Arc::clone(&files);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, files, ConnectionSettings::default());
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod header;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod static_files;
pub mod writer;

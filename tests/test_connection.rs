use std::fs;
use std::sync::Arc;
use std::time::Duration;

use filament::http::connection::{Connection, ConnectionSettings};
use filament::http::static_files::StaticFiles;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

const INDEX: &str = "Hello, World!";

struct Harness {
    _root: tempfile::TempDir,
    files: Arc<StaticFiles>,
}

impl Harness {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("index.html"), INDEX).unwrap();
        let files = Arc::new(StaticFiles::new(root.path(), "index.html"));
        Self { _root: root, files }
    }

    fn spawn(
        &self,
        settings: ConnectionSettings,
    ) -> (DuplexStream, tokio::task::JoinHandle<anyhow::Result<()>>) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let files = Arc::clone(&self.files);
        let handle = tokio::spawn(async move {
            let mut conn = Connection::new(server, files, settings);
            conn.run().await
        });
        (client, handle)
    }

    /// Sends `request` in one write and collects everything until close.
    async fn exchange(&self, request: &[u8]) -> Vec<u8> {
        let (mut client, handle) = self.spawn(ConnectionSettings::default());
        client.write_all(request).await.unwrap();

        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        handle.await.unwrap().unwrap();
        out
    }
}

fn status_line(response: &[u8]) -> &str {
    let text = std::str::from_utf8(response).unwrap();
    text.split("\r\n").next().unwrap()
}

#[tokio::test]
async fn test_get_index_end_to_end() {
    let harness = Harness::new();

    let out = harness
        .exchange(b"GET /index.html HTTP/1.1\r\nHost: x\r\n\r\n")
        .await;
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("\r\nContent-Length: 13\r\n"));

    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    assert!(head.contains("Content-Type: text/html"));
    assert_eq!(body, INDEX);
}

#[tokio::test]
async fn test_head_sends_headers_only() {
    let harness = Harness::new();

    let out = harness.exchange(b"HEAD / HTTP/1.0\r\n\r\n").await;
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(text.contains("Content-Length: 13\r\n"));
    assert!(text.ends_with("\r\n\r\n"));
}

#[tokio::test]
async fn test_error_statuses() {
    let harness = Harness::new();

    let cases: [(&[u8], &str); 5] = [
        (b"XYZ\r\n\r\n", "HTTP/1.1 400 Bad Request"),
        (b"GET / HTTP/3.0\r\n\r\n", "HTTP/1.1 400 Bad Request"),
        (b"POST / HTTP/1.1\r\n\r\n", "HTTP/1.1 405 Method Not Allowed"),
        (b"GET /missing HTTP/1.1\r\n\r\n", "HTTP/1.1 404 Not Found"),
        (b"GET /../../etc/passwd HTTP/1.1\r\n\r\n", "HTTP/1.1 403 Forbidden"),
    ];

    for (request, expected) in cases {
        let out = harness.exchange(request).await;
        assert_eq!(status_line(&out), expected);
        assert!(out.ends_with(b"Connection: close\r\n\r\n"));
    }
}

#[tokio::test]
async fn test_request_split_across_writes() {
    let harness = Harness::new();
    let (mut client, handle) = harness.spawn(ConnectionSettings::default());

    for chunk in [&b"GET /index.html HT"[..], b"TP/1.1\r\nHost: x\r", b"\n\r", b"\n"] {
        client.write_all(chunk).await.unwrap();
        tokio::task::yield_now().await;
    }

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    handle.await.unwrap().unwrap();

    assert_eq!(status_line(&out), "HTTP/1.1 200 OK");
    assert!(out.ends_with(INDEX.as_bytes()));
}

#[tokio::test]
async fn test_trailing_bytes_are_ignored() {
    let harness = Harness::new();

    let out = harness
        .exchange(b"GET / HTTP/1.1\r\n\r\nGET /missing HTTP/1.1\r\n\r\n")
        .await;
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.matches("HTTP/1.1 ").count(), 1);
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
}

#[tokio::test]
async fn test_eof_before_boundary_closes_silently() {
    let harness = Harness::new();
    let (mut client, handle) = harness.spawn(ConnectionSettings::default());

    client.write_all(b"GET / HTTP/1.1\r\nHost: x\r\n").await.unwrap();
    client.shutdown().await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    handle.await.unwrap().unwrap();

    assert!(out.is_empty());
}

#[tokio::test]
async fn test_oversized_header_block_is_bad_request() {
    let harness = Harness::new();
    let settings = ConnectionSettings {
        max_header_bytes: 256,
        ..ConnectionSettings::default()
    };
    let (mut client, handle) = harness.spawn(settings);

    let mut request = b"GET / HTTP/1.1\r\nX-Filler: ".to_vec();
    request.extend(std::iter::repeat_n(b'a', 1024));
    client.write_all(&request).await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    handle.await.unwrap().unwrap();

    assert_eq!(status_line(&out), "HTTP/1.1 400 Bad Request");
}

#[tokio::test]
async fn test_idle_client_times_out_without_response() {
    let harness = Harness::new();
    let settings = ConnectionSettings {
        read_timeout: Duration::from_millis(50),
        ..ConnectionSettings::default()
    };
    let (mut client, handle) = harness.spawn(settings);

    client.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    handle.await.unwrap().unwrap();

    assert!(out.is_empty());
}

#[tokio::test]
async fn test_client_that_never_reads_is_dropped() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("big.bin"), vec![b'x'; 1024 * 1024]).unwrap();
    let files = Arc::new(StaticFiles::new(root.path(), "index.html"));
    let settings = ConnectionSettings {
        write_timeout: Duration::from_millis(100),
        ..ConnectionSettings::default()
    };

    let (mut client, server) = tokio::io::duplex(1024);
    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server, files, settings);
        conn.run().await
    });

    client
        .write_all(b"GET /big.bin HTTP/1.1\r\n\r\n")
        .await
        .unwrap();

    // The client stays connected but never reads the response.
    let finished = tokio::time::timeout(Duration::from_secs(2), handle).await;
    assert!(finished.expect("connection should give up writing").unwrap().is_ok());
    drop(client);
}

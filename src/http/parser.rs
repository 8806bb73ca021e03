use thiserror::Error;

use crate::http::header::{HeaderLine, Headers};
use crate::http::request::{HttpVersion, Method, Request};
use crate::http::response::StatusCode;

const HEADERS_END: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty request")]
    Empty,
    #[error("malformed request line")]
    MalformedRequestLine,
    #[error("unsupported HTTP version")]
    UnsupportedVersion,
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ParseError {
    /// Status sent back to the client for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::Empty => StatusCode::InternalServerError,
            ParseError::MalformedRequestLine | ParseError::UnsupportedVersion => {
                StatusCode::BadRequest
            }
            ParseError::MethodNotAllowed => StatusCode::MethodNotAllowed,
        }
    }
}

/// Parses one header block (request line through the blank line).
///
/// The request line must be exactly `METHOD SP URI SP VERSION`. Lines after
/// it are kept verbatim and never cause a failure.
pub fn parse_http_request(block: &[u8]) -> Result<Request, ParseError> {
    if block.is_empty() {
        return Err(ParseError::Empty);
    }

    let block = block.strip_suffix(HEADERS_END).unwrap_or(block);
    let mut lines = split_lines(block);

    let request_line = lines.next().unwrap_or_default();
    let request_line =
        std::str::from_utf8(request_line).map_err(|_| ParseError::MalformedRequestLine)?;

    let (method_str, uri, version_str) = split_request_line(request_line)?;

    let version = HttpVersion::from_str_opt(version_str).ok_or(ParseError::UnsupportedVersion)?;

    let method = Method::from_str(method_str)
        .filter(Method::is_supported)
        .ok_or(ParseError::MethodNotAllowed)?;

    // Header bytes need not be UTF-8 (obs-text); invalid sequences are replaced.
    let mut headers = Headers::new();
    for line in lines.filter(|l| !l.is_empty()) {
        headers.push(HeaderLine::raw(String::from_utf8_lossy(line)));
    }

    Ok(Request {
        method,
        uri: uri.to_string(),
        version,
        headers,
    })
}

fn split_lines(buf: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = Some(buf);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.windows(2).position(|w| w == b"\r\n") {
            Some(pos) => {
                rest = Some(&current[pos + 2..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

fn split_request_line(line: &str) -> Result<(&str, &str, &str), ParseError> {
    let mut parts = line.split(' ');

    let tokens = (parts.next(), parts.next(), parts.next(), parts.next());
    match tokens {
        (Some(method), Some(uri), Some(version), None)
            if !method.is_empty() && !uri.is_empty() && !version.is_empty() =>
        {
            Ok((method, uri, version))
        }
        _ => Err(ParseError::MalformedRequestLine),
    }
}

/// Finds the end of the header block in `buf`.
///
/// Returns the offset just past the terminating CRLFCRLF. Scanning starts
/// at `from`, backed up by three bytes so a terminator split across two
/// reads is still found.
pub fn find_headers_end(buf: &[u8], from: usize) -> Option<usize> {
    let start = from.saturating_sub(HEADERS_END.len() - 1);
    if start >= buf.len() {
        return None;
    }

    buf[start..]
        .windows(HEADERS_END.len())
        .position(|w| w == HEADERS_END)
        .map(|pos| start + pos + HEADERS_END.len())
}

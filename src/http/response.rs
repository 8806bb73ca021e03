use tokio::fs::File;

use crate::http::header::{HeaderLine, Headers};
use crate::http::request::{ALLOWED_METHODS, HttpVersion};

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): File found and sent
/// - `BadRequest` (400): Malformed request line or oversized header block
/// - `Forbidden` (403): Path escapes the document root or permission denied
/// - `NotFound` (404): No regular file at the resolved path
/// - `MethodNotAllowed` (405): Method other than GET or HEAD
/// - `InternalServerError` (500): Anything else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use filament::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Maps a numeric code back to a status. Codes the server never emits
    /// become 500.
    pub fn from_u16(code: u16) -> Self {
        match code {
            200 => StatusCode::Ok,
            400 => StatusCode::BadRequest,
            403 => StatusCode::Forbidden,
            404 => StatusCode::NotFound,
            405 => StatusCode::MethodNotAllowed,
            _ => StatusCode::InternalServerError,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use filament::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// An open file to be sent as the response body.
///
/// `len` is always non-zero; empty files are answered without a body.
#[derive(Debug)]
pub struct FileBody {
    pub file: File,
    pub len: u64,
}

/// A complete HTTP response ready to be serialized.
///
/// The response owns its body file; the file is closed once the writer has
/// copied it to the client.
#[derive(Debug)]
pub struct Response {
    pub version: HttpVersion,
    pub status: StatusCode,
    pub headers: Headers,
    pub body: Option<FileBody>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .version(HttpVersion::Http10)
///     .header("Content-Type", "text/html")
///     .body(file, len)
///     .build();
/// ```
pub struct ResponseBuilder {
    version: HttpVersion,
    status: StatusCode,
    headers: Headers,
    body: Option<FileBody>,
}

impl ResponseBuilder {
    /// Creates a new HTTP/1.1 response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: HttpVersion::Http11,
            status,
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    /// Appends a header. Order is kept and duplicates are not merged.
    pub fn header(mut self, name: &str, value: impl std::fmt::Display) -> Self {
        self.headers.push(HeaderLine::new(name, value));
        self
    }

    /// Attaches a file body. A zero length leaves the response bodiless.
    pub fn body(mut self, file: File, len: u64) -> Self {
        self.body = (len > 0).then_some(FileBody { file, len });
        self
    }

    pub fn build(self) -> Response {
        Response {
            version: self.version,
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Synthetic response built from a status alone, used for every error path.
    pub fn default_for(status: StatusCode) -> Self {
        let mut builder = ResponseBuilder::new(status);
        if status == StatusCode::MethodNotAllowed {
            builder = builder.header("Allow", ALLOWED_METHODS);
        }
        builder
            .header("Content-Length", 0)
            .header("Connection", "close")
            .build()
    }

    pub fn bad_request() -> Self {
        Self::default_for(StatusCode::BadRequest)
    }

    pub fn internal_error() -> Self {
        Self::default_for(StatusCode::InternalServerError)
    }
}

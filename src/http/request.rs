use crate::http::header::Headers;

/// HTTP request methods.
///
/// Every method below is recognized by the parser, but only the ones for
/// which [`Method::is_supported`] returns `true` are served. The rest are
/// answered with 405 Method Not Allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// Matching is case-sensitive, as method tokens are.
    ///
    /// # Example
    ///
    /// ```
    /// # use filament::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }

    /// Whether the static file server can answer this method.
    pub fn is_supported(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD)
    }
}

/// Value of the `Allow` header sent with 405 responses.
pub const ALLOWED_METHODS: &str = "GET, HEAD";

/// HTTP protocol version of a request or response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersion {
    Http10,
    Http11,
    Unknown,
}

impl HttpVersion {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "HTTP/1.0" => Some(HttpVersion::Http10),
            "HTTP/1.1" => Some(HttpVersion::Http11),
            _ => None,
        }
    }

    /// Wire literal; `Unknown` falls back to `HTTP/1.0`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::Http11 => "HTTP/1.1",
            HttpVersion::Http10 | HttpVersion::Unknown => "HTTP/1.0",
        }
    }
}

/// A parsed request line plus the verbatim header lines that followed it.
///
/// Built by [`parse_http_request`](crate::http::parser::parse_http_request)
/// and never modified afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Request target exactly as sent, query string included.
    pub uri: String,
    pub version: HttpVersion,
    pub headers: Headers,
}

impl Request {
    /// Retrieves a header value by name, case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }
}

//! Maps requests onto files under a document root.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::{self, File};

use crate::http::mime;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("access forbidden")]
    Forbidden,
    #[error("file not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(#[source] io::Error),
}

impl BuildError {
    /// Status sent back to the client for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            BuildError::Forbidden => StatusCode::Forbidden,
            BuildError::NotFound => StatusCode::NotFound,
            BuildError::Internal(_) => StatusCode::InternalServerError,
        }
    }

    fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => BuildError::NotFound,
            io::ErrorKind::PermissionDenied => BuildError::Forbidden,
            _ => BuildError::Internal(err),
        }
    }
}

/// Serves regular files from a document root.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index_file: String,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_file: index_file.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lexically maps a request target onto a path under the root.
    ///
    /// Query and fragment are dropped and the path is percent-decoded. A
    /// `..` that would climb above the root is `Forbidden`; a trailing `/`
    /// selects the index file. Symlinks are checked later, in
    /// [`build_response`](Self::build_response).
    pub fn resolve_path(&self, uri: &str) -> Result<PathBuf, BuildError> {
        let path = uri.split(['?', '#']).next().unwrap_or_default();
        let decoded = urlencoding::decode(path).map_err(|_| BuildError::NotFound)?;

        if !decoded.starts_with('/') {
            return Err(BuildError::NotFound);
        }
        if decoded.contains('\0') {
            return Err(BuildError::Forbidden);
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(BuildError::Forbidden);
                    }
                }
                s => segments.push(s),
            }
        }

        let mut resolved = self.root.clone();
        resolved.extend(&segments);
        if decoded.ends_with('/') {
            resolved.push(&self.index_file);
        }

        Ok(resolved)
    }

    /// Resolves the request and opens the file it names.
    ///
    /// On success the response owns the open file (GET only; HEAD gets the
    /// same headers and no body).
    pub async fn build_response(&self, req: &Request) -> Result<Response, BuildError> {
        let path = self.resolve_path(&req.uri)?;

        let root = fs::canonicalize(&self.root)
            .await
            .map_err(BuildError::Internal)?;
        let target = fs::canonicalize(&path).await.map_err(BuildError::from_io)?;

        if !target.starts_with(&root) {
            tracing::warn!(uri = %req.uri, resolved = %target.display(), "Symlink escapes document root");
            return Err(BuildError::Forbidden);
        }

        // Checked before opening so FIFOs and devices never block an open.
        let meta = fs::metadata(&target).await.map_err(BuildError::from_io)?;
        if !meta.is_file() {
            return Err(BuildError::NotFound);
        }

        let file = File::open(&target).await.map_err(BuildError::from_io)?;
        let meta = file.metadata().await.map_err(BuildError::from_io)?;
        let len = meta.len();

        tracing::debug!(path = %target.display(), len, "Resolved static file");

        let mut builder = ResponseBuilder::new(StatusCode::Ok)
            .version(req.version)
            .header("Content-Type", mime::content_type(&path))
            .header("Content-Length", len);

        if let Ok(modified) = meta.modified() {
            builder = builder.header("Last-Modified", httpdate::fmt_http_date(modified));
        }

        builder = builder.header("Connection", "close");

        if req.method == Method::GET {
            builder = builder.body(file, len);
        }

        Ok(builder.build())
    }
}

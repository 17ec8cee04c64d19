//! Plain-data HTTP types shared by the client double and its consumers.
//!
//! # Design
//! Requests and responses are described as plain owned data so they can be
//! constructed in tests without a transport and compared with ordinary
//! assertions. Headers are an *ordered* list of name/value pairs rather than
//! a map: the double preserves exactly what the consumer set, and names are
//! matched case-sensitively as given.

use std::fmt;

use crate::body::{BodyError, BodyReader};

/// The header that governs body draining. A request with a body must carry
/// it with a non-negative decimal value.
pub const CONTENT_LENGTH: &str = "Content-Length";

/// Ordered sequence of header name/value pairs.
pub type HeaderList = Vec<(String, String)>;

/// Return the value of the first header whose name equals `name` exactly.
pub fn find_header<'a>(headers: &'a HeaderList, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one HTTP call.
///
/// The URI, method and headers are fixed at construction. The optional body
/// source is consumed incrementally by the dispatcher; it is the only part
/// of a request that advances state when read.
pub struct Request {
    uri: String,
    method: Method,
    extra_headers: HeaderList,
    body: Option<Box<dyn BodyReader>>,
}

impl Request {
    /// A request without a body.
    pub fn new(uri: impl Into<String>, method: Method, extra_headers: HeaderList) -> Self {
        Self {
            uri: uri.into(),
            method,
            extra_headers,
            body: None,
        }
    }

    /// A request whose body is read from `body`. The caller is responsible
    /// for also setting a matching `Content-Length` header; the dispatcher
    /// rejects bodies without one.
    pub fn with_body(
        uri: impl Into<String>,
        method: Method,
        extra_headers: HeaderList,
        body: Box<dyn BodyReader>,
    ) -> Self {
        Self {
            uri: uri.into(),
            method,
            extra_headers,
            body: Some(body),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn extra_headers(&self) -> &HeaderList {
        &self.extra_headers
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Read the next chunk of the body into `buf`.
    ///
    /// Delegates to the body source; a request without a body reports
    /// `BodyError::Exhausted` immediately.
    pub fn read_body(&mut self, buf: &mut [u8]) -> Result<usize, BodyError> {
        match &mut self.body {
            Some(reader) => reader.read(buf),
            None => Err(BodyError::Exhausted),
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("uri", &self.uri)
            .field("method", &self.method)
            .field("extra_headers", &self.extra_headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// A request flattened to plain data, as handed to the `ResponseProvider`.
///
/// The body source has already been drained into `body` by the time a
/// provider sees one of these, so providers never deal with streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRequest {
    pub uri: String,
    pub method: Method,
    pub headers: HeaderList,
    pub body: Vec<u8>,
}

/// A scripted HTTP response, produced by a `ResponseProvider`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: HeaderList,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: HeaderList, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// A `200 OK` response with no headers.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, Vec::new(), body)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

//! HTTP responses.
//!
//! Handlers build a [`Reply`] value; [`send`] turns it into a
//! `tiny_http` response. Keeping replies as plain data lets routing be
//! tested without sockets.

use anyhow::{Result, anyhow};
use tiny_http::{Header, Request, Response, StatusCode};

use crate::utils::mime::types::{HTML, PLAIN};

/// Status, headers and body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn new(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", content_type.to_string())],
            body: body.into(),
        }
    }

    pub fn html(status: u16, body: String) -> Self {
        Self::new(status, HTML, body)
    }

    pub fn plain(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, PLAIN, body)
    }

    /// Response without body or content type.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// First header value named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Write `reply` to the client. `tiny_http` drops the body for HEAD.
pub fn send(request: Request, reply: Reply) -> Result<()> {
    let mut response = Response::from_data(reply.body).with_status_code(StatusCode(reply.status));
    for (name, value) in &reply.headers {
        let header = Header::from_bytes(name.as_bytes(), value.as_bytes())
            .map_err(|()| anyhow!("invalid header {name}: {value:?}"))?;
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn unavailable() -> Reply {
    Reply::plain(503, "503 Service Unavailable")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup() {
        let reply = Reply::html(200, "<p>".into()).with_header("ETag", "\"x\"");

        assert_eq!(reply.header("content-type"), Some(HTML));
        assert_eq!(reply.header("etag"), Some("\"x\""));
        assert_eq!(reply.header("last-modified"), None);
    }

    #[test]
    fn test_empty() {
        let reply = Reply::empty(304);
        assert!(reply.body.is_empty());
        assert!(reply.header("content-type").is_none());
    }

    #[test]
    fn test_unavailable() {
        assert_eq!(unavailable().status, 503);
    }
}

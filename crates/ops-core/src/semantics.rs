//! HTTP semantics helpers.
//!
//! The remote API only uses four methods; this module maps them onto `reqwest` and derives MCP
//! `ToolAnnotations` from RFC 9110-style method semantics.

use reqwest::Method;
use rmcp::model::ToolAnnotations;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate MCP tool annotations based on HTTP method semantics.
///
/// `openWorldHint` is always `true`: every operation talks to the remote service.
#[must_use]
pub fn annotations_for_method(method: HttpMethod) -> ToolAnnotations {
    let (read_only, destructive, idempotent) = match method {
        HttpMethod::Get => (true, false, true),
        HttpMethod::Post => (false, false, false),
        HttpMethod::Put | HttpMethod::Delete => (false, true, true),
    };
    ToolAnnotations {
        title: None,
        read_only_hint: Some(read_only),
        destructive_hint: Some(destructive),
        idempotent_hint: Some(idempotent),
        open_world_hint: Some(true),
    }
}

//! Executes built requests against the remote service.
//!
//! One network call per request, no retry, no backoff. Non-2xx responses are returned as-is; the
//! normalizer decides what they mean.

use crate::error::{OpsError, Result};
use crate::request::{BuiltRequest, FileUpload, RequestBody};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tokio_util::io::ReaderStream;
use url::Url;

/// Raw response as received from the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response.
    ///
    /// Any file attached to the request is opened here and released when this call returns.
    async fn send(&self, request: BuiltRequest) -> Result<RawResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Option<Duration>,
    max_response_bytes: Option<usize>,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Option<Duration>, max_response_bytes: Option<usize>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| OpsError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            timeout,
            max_response_bytes,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: BuiltRequest) -> Result<RawResponse> {
        let BuiltRequest {
            method,
            url,
            headers,
            body,
            ..
        } = request;

        let mut builder = self.client.request(method.as_reqwest(), url);
        for (key, value) in &headers {
            builder = builder.header(key, value);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(payload) => builder.json(&payload),
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart { fields, file } => {
                builder.multipart(multipart_form(fields, file).await?)
            }
        };
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(std::string::ToString::to_string);
        let body = read_response_body_limited_bytes(response, self.max_response_bytes).await?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Build a multipart form whose file part streams from an open handle.
///
/// The handle is owned by the form, so it is closed whenever the request body is dropped.
async fn multipart_form(fields: Vec<(String, String)>, upload: FileUpload) -> Result<Form> {
    let file = tokio::fs::File::open(&upload.path).await.map_err(|e| {
        OpsError::Validation(format!(
            "Cannot open file_path '{}': {e}",
            upload.path.display()
        ))
    })?;
    let file_name = upload
        .path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());

    let part = Part::stream(reqwest::Body::wrap_stream(ReaderStream::new(file)))
        .file_name(file_name)
        .mime_str(mime::APPLICATION_OCTET_STREAM.as_ref())?;

    let mut form = Form::new();
    for (key, value) in fields {
        form = form.text(key, value);
    }
    Ok(form.part(upload.part, part))
}

async fn read_response_body_limited_bytes(
    mut response: reqwest::Response,
    max_bytes: Option<usize>,
) -> Result<Vec<u8>> {
    let Some(max) = max_bytes else {
        let bytes = response.bytes().await?;
        return Ok(bytes.to_vec());
    };

    if let Some(len) = response.content_length()
        && len > max as u64
    {
        return Err(OpsError::Transport(format!(
            "Response too large: {len} bytes (limit {max})"
        )));
    }

    let mut out: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if out.len().saturating_add(chunk.len()) > max {
            return Err(OpsError::Transport(format!(
                "Response too large: exceeded {max} bytes"
            )));
        }
        out.extend_from_slice(&chunk);
    }

    Ok(out)
}

/// URL without credentials, query or fragment, for logs and error strings.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_url_drops_credentials_and_query() {
        let url = Url::parse("https://user:pw@api.example.test/tenant?status=FAILED#x").expect("url");
        assert_eq!(redact_url(&url), "https://api.example.test/tenant");
    }

    #[test]
    fn success_range_is_2xx() {
        let resp = |status| RawResponse {
            status,
            content_type: None,
            body: Vec::new(),
        };
        assert!(resp(200).is_success());
        assert!(resp(204).is_success());
        assert!(!resp(199).is_success());
        assert!(!resp(302).is_success());
        assert!(!resp(404).is_success());
    }

    #[tokio::test]
    async fn unreadable_file_fails_before_sending() {
        let err = multipart_form(
            Vec::new(),
            FileUpload {
                part: "file".to_string(),
                path: "/definitely/not/here.bin".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, OpsError::Validation(_)));
        assert!(err.to_string().contains("/definitely/not/here.bin"));
    }
}

//! Turns an operation plus call arguments into a fully specified HTTP request.
//!
//! Every validation failure here happens before any network call.

use crate::catalog::{
    BodyEncoding, ContentSlot, Operation, ParamKind, ParamLocation, ParamSpec, Presence,
};
use crate::error::{OpsError, Result};
use crate::semantics::HttpMethod;
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Multipart part name used for file-backed content.
pub const FILE_PART: &str = "file";

pub struct BuiltRequest {
    pub operation: &'static str,
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl fmt::Debug for BuiltRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("BuiltRequest")
            .field("operation", &self.operation)
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &header_names)
            .field("body", &self.body)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// URL-encoded form fields.
    Form(Vec<(String, String)>),
    /// Form fields plus one file part, streamed from disk when the request is sent.
    Multipart {
        fields: Vec<(String, String)>,
        file: FileUpload,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub part: String,
    pub path: PathBuf,
}

/// Builds requests against a fixed base URL.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
}

impl RequestBuilder {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the request for `op`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a required parameter is missing, a parameter has the wrong
    /// JSON type, or no content candidate is supplied for a content-choice operation.
    pub fn build(
        &self,
        op: &Operation,
        args: &Map<String, Value>,
        headers: Vec<(String, String)>,
    ) -> Result<BuiltRequest> {
        let url = self.build_url(op, args)?;
        let body = match op.encoding() {
            BodyEncoding::None => RequestBody::Empty,
            BodyEncoding::Json => build_json_body(op.params(), args)?,
            BodyEncoding::Form => build_form_body(op.params(), args)?,
        };
        Ok(BuiltRequest {
            operation: op.name(),
            method: op.method(),
            url,
            headers,
            body,
        })
    }

    fn build_url(&self, op: &Operation, args: &Map<String, Value>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                OpsError::Config(format!("base URL '{}' cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty();
            for raw in op.path_template().split('/').filter(|s| !s.is_empty()) {
                match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = string_arg(args, name)?.ok_or_else(|| missing(name))?;
                        segments.push(&value);
                    }
                    None => {
                        segments.push(raw);
                    }
                }
            }
        }

        let mut query: Vec<(&str, String)> = Vec::new();
        for p in op
            .params()
            .iter()
            .filter(|p| p.location == ParamLocation::Query)
        {
            if let Some(value) = string_arg(args, p.name)? {
                query.push((p.name, value));
            }
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &query {
                pairs.append_pair(k, v);
            }
        }

        Ok(url)
    }
}

fn build_json_body(params: &[ParamSpec], args: &Map<String, Value>) -> Result<RequestBody> {
    if let Some(p) = params.iter().find(|p| p.location == ParamLocation::Updates) {
        return match lookup(args, p.name) {
            Some(Value::Object(updates)) => Ok(RequestBody::Json(Value::Object(updates.clone()))),
            Some(_) => Err(OpsError::Validation(format!(
                "Parameter '{}' must be a JSON object",
                p.name
            ))),
            None => Err(missing(p.name)),
        };
    }

    let mut body = Map::new();
    for p in params.iter().filter(|p| p.location == ParamLocation::Body) {
        let value = match p.kind {
            ParamKind::Object => object_arg(args, p.name)?,
            ParamKind::String | ParamKind::Choice(_) => {
                let s = raw_string_arg(args, p.name)?;
                // "" is sent verbatim for null-defaulted fields and dropped otherwise.
                match p.presence {
                    Presence::SendNull | Presence::SendEmptyObject => s,
                    Presence::Required | Presence::Omit => s.filter(|s| !s.is_empty()),
                }
                .map(Value::String)
            }
        };
        match (value, p.presence) {
            (Some(v), _) => {
                body.insert(p.name.to_string(), v);
            }
            (None, Presence::Required) => return Err(missing(p.name)),
            (None, Presence::Omit) => {}
            (None, Presence::SendNull) => {
                body.insert(p.name.to_string(), Value::Null);
            }
            (None, Presence::SendEmptyObject) => {
                body.insert(p.name.to_string(), Value::Object(Map::new()));
            }
        }
    }
    Ok(RequestBody::Json(Value::Object(body)))
}

fn build_form_body(params: &[ParamSpec], args: &Map<String, Value>) -> Result<RequestBody> {
    let mut fields: Vec<(String, String)> = Vec::new();
    for p in params.iter().filter(|p| p.location == ParamLocation::Form) {
        match string_arg(args, p.name)? {
            Some(v) => fields.push((p.name.to_string(), v)),
            None if p.presence == Presence::Required => return Err(missing(p.name)),
            None => {}
        }
    }

    let candidates: Vec<(&ParamSpec, ContentSlot)> = params
        .iter()
        .filter_map(|p| match p.location {
            ParamLocation::Content(slot) => Some((p, slot)),
            _ => None,
        })
        .collect();
    if candidates.is_empty() {
        return Ok(RequestBody::Form(fields));
    }

    for (p, slot) in &candidates {
        let Some(value) = string_arg(args, p.name)? else {
            continue;
        };
        return Ok(match slot {
            ContentSlot::File => RequestBody::Multipart {
                fields,
                file: FileUpload {
                    part: FILE_PART.to_string(),
                    path: PathBuf::from(value),
                },
            },
            ContentSlot::Field => {
                fields.push((p.name.to_string(), value));
                RequestBody::Form(fields)
            }
        });
    }

    let names: Vec<&str> = candidates.iter().map(|(p, _)| p.name).collect();
    Err(OpsError::Validation(format!(
        "Must provide one of: {}",
        one_of_phrase(&names)
    )))
}

/// `["a", "b", "c"]` -> `"a, b, or c"`.
fn one_of_phrase(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => (*one).to_string(),
        [a, b] => format!("{a} or {b}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    }
}

fn missing(name: &str) -> OpsError {
    OpsError::Validation(format!("Missing required parameter: {name}"))
}

/// Argument value, treating explicit `null` as absent.
fn lookup<'a>(args: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    args.get(name).filter(|v| !v.is_null())
}

/// Scalar argument as a string; `null` and `""` count as absent.
fn string_arg(args: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    Ok(raw_string_arg(args, name)?.filter(|s| !s.is_empty()))
}

fn raw_string_arg(args: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match lookup(args, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(OpsError::Validation(format!(
            "Parameter '{name}' must be a string"
        ))),
    }
}

fn object_arg(args: &Map<String, Value>, name: &str) -> Result<Option<Value>> {
    match lookup(args, name) {
        None => Ok(None),
        Some(v @ Value::Object(_)) => Ok(Some(v.clone())),
        Some(_) => Err(OpsError::Validation(format!(
            "Parameter '{name}' must be a JSON object"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProfile, OperationCatalog};
    use serde_json::json;

    fn build(name: &str, args: Value) -> Result<BuiltRequest> {
        let catalog = OperationCatalog::new(CatalogProfile::Governed);
        let op = catalog.get(name).expect("operation exists");
        let base = Url::parse("https://api.example.test/v1/").expect("url");
        RequestBuilder::new(base).build(op, args.as_object().expect("object"), Vec::new())
    }

    #[test]
    fn substitutes_path_ids_under_base_path() {
        let req = build(
            "get_generation",
            json!({"tenant_id": "t1", "brand_id": "b1", "worker_id": "w1", "generation_id": "g1"}),
        )
        .expect("built");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url.as_str(),
            "https://api.example.test/v1/tenant/t1/brand/b1/worker/w1/generation/g1"
        );
        assert_eq!(req.body, RequestBody::Empty);
    }

    #[test]
    fn path_ids_are_percent_encoded() {
        let req = build("get_tenant", json!({"tenant_id": "a/b c"})).expect("built");
        assert_eq!(req.url.path(), "/v1/tenant/a%2Fb%20c");
    }

    #[test]
    fn missing_path_id_is_a_validation_error() {
        let err = build("get_brand", json!({"tenant_id": "t1"})).unwrap_err();
        assert!(matches!(err, OpsError::Validation(_)));
        assert!(err.to_string().contains("brand_id"));

        let err = build("get_brand", json!({"tenant_id": "t1", "brand_id": ""})).unwrap_err();
        assert!(err.to_string().contains("brand_id"));
    }

    #[test]
    fn create_tenant_sends_null_and_empty_object_defaults() {
        let req = build("create_tenant", json!({"name": "Acme"})).expect("built");
        assert_eq!(req.url.path(), "/v1/tenant");
        assert_eq!(
            req.body,
            RequestBody::Json(json!({
                "name": "Acme",
                "description": null,
                "settings": {},
                "concurrency_limits": null
            }))
        );
    }

    #[test]
    fn explicit_null_settings_still_become_empty_object() {
        let req = build(
            "create_brand",
            json!({"tenant_id": "t1", "name": "B", "description": "d", "settings": null}),
        )
        .expect("built");
        assert_eq!(
            req.body,
            RequestBody::Json(json!({"name": "B", "description": "d", "settings": {}}))
        );
    }

    #[test]
    fn optional_context_is_omitted_when_absent() {
        let args = json!({"tenant_id": "t", "brand_id": "b", "worker_id": "w"});
        let req = build("create_generation", args).expect("built");
        assert_eq!(req.body, RequestBody::Json(json!({})));

        let args = json!({"tenant_id": "t", "brand_id": "b", "worker_id": "w", "context": "launch"});
        let req = build("create_generation", args).expect("built");
        assert_eq!(req.body, RequestBody::Json(json!({"context": "launch"})));
    }

    #[test]
    fn missing_required_body_field_fails() {
        let err = build(
            "create_worker",
            json!({"tenant_id": "t", "output_type": "TEXT", "name": "w"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("prompt"));
    }

    #[test]
    fn wrong_type_for_object_field_fails() {
        let err = build("create_tenant", json!({"name": "Acme", "settings": "x"})).unwrap_err();
        assert!(err.to_string().contains("settings"));
    }

    #[test]
    fn updates_object_is_the_whole_body() {
        let req = build(
            "update_prompt",
            json!({"tenant_id": "t", "prompt_id": "p", "updates": {"name": "n", "settings": {"k": 1}}}),
        )
        .expect("built");
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            req.body,
            RequestBody::Json(json!({"name": "n", "settings": {"k": 1}}))
        );

        let err = build(
            "update_prompt",
            json!({"tenant_id": "t", "prompt_id": "p", "updates": ["x"]}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("updates"));
    }

    #[test]
    fn list_filters_only_sent_when_supplied() {
        let req = build("list_sources", json!({"tenant_id": "t", "brand_id": "b"})).expect("built");
        assert_eq!(req.url.query(), None);

        let req = build(
            "list_sources",
            json!({"tenant_id": "t", "brand_id": "b", "source_type": "", "status": "FAILED"}),
        )
        .expect("built");
        assert_eq!(req.url.query(), Some("status=FAILED"));
    }

    #[test]
    fn source_without_content_fails_with_one_of_message() {
        let err = build(
            "create_source",
            json!({"tenant_id": "t", "brand_id": "b", "name": "n", "source_type": "KNOWLEDGE"}),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation error: Must provide one of: file_path, url, or text"
        );
    }

    #[test]
    fn source_content_precedence_is_file_then_url_then_text() {
        let base = json!({"tenant_id": "t", "brand_id": "b", "name": "n", "source_type": "SAMPLE"});
        let with = |extra: Value| {
            let mut v = base.clone();
            for (k, val) in extra.as_object().expect("object") {
                v[k] = val.clone();
            }
            build("create_source", v).expect("built").body
        };

        match with(json!({"file_path": "/tmp/a.pdf", "url": "https://x", "text": "t"})) {
            RequestBody::Multipart { fields, file } => {
                assert_eq!(file.part, "file");
                assert_eq!(file.path, PathBuf::from("/tmp/a.pdf"));
                assert!(!fields.iter().any(|(k, _)| k == "url" || k == "text"));
            }
            other => panic!("expected multipart, got {other:?}"),
        }

        assert_eq!(
            with(json!({"url": "https://x", "text": "t"})),
            RequestBody::Form(vec![
                ("name".to_string(), "n".to_string()),
                ("source_type".to_string(), "SAMPLE".to_string()),
                ("url".to_string(), "https://x".to_string()),
            ])
        );

        assert_eq!(
            with(json!({"text": "hello", "description": "d", "content_type": "TEXT"})),
            RequestBody::Form(vec![
                ("name".to_string(), "n".to_string()),
                ("source_type".to_string(), "SAMPLE".to_string()),
                ("content_type".to_string(), "TEXT".to_string()),
                ("description".to_string(), "d".to_string()),
                ("text".to_string(), "hello".to_string()),
            ])
        );
    }

    #[test]
    fn one_of_phrase_joins_like_prose() {
        assert_eq!(one_of_phrase(&["a"]), "a");
        assert_eq!(one_of_phrase(&["a", "b"]), "a or b");
        assert_eq!(one_of_phrase(&["a", "b", "c"]), "a, b, or c");
    }

    #[test]
    fn debug_output_hides_header_values() {
        let catalog = OperationCatalog::new(CatalogProfile::Governed);
        let op = catalog.get("list_tenants").expect("op");
        let base = Url::parse("https://api.example.test").expect("url");
        let req = RequestBuilder::new(base)
            .build(
                op,
                &Map::new(),
                vec![("authorization".to_string(), "Bearer sekrit".to_string())],
            )
            .expect("built");
        let dbg = format!("{req:?}");
        assert!(dbg.contains("authorization"));
        assert!(!dbg.contains("sekrit"));
    }
}

//! Operation dispatch: catalog lookup -> auth -> request -> transport -> normalize.
//!
//! [`ContentOps::call`] is the only entry point used by the invocation host. It never returns an
//! `Err`: every failure is folded into an [`Outcome::Failed`] envelope here, once, for all
//! operations.

use crate::auth::{self, Credentials};
use crate::catalog::{Operation, OperationCatalog};
use crate::config::OpsConfig;
use crate::error::{OpsError, Result};
use crate::normalize::{self, Outcome};
use crate::request::RequestBuilder;
use crate::semantics::annotations_for_method;
use crate::transport::{HttpTransport, Transport, redact_url};
use rmcp::model::{JsonObject, Tool};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ContentOps {
    inner: Arc<ContentOpsInner>,
}

struct ContentOpsInner {
    catalog: OperationCatalog,
    requests: RequestBuilder,
    transport: Arc<dyn Transport>,
}

impl ContentOps {
    /// Build a dispatcher with the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &OpsConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout(), config.max_response_bytes)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a dispatcher over an explicit transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_transport(config: &OpsConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        Ok(Self {
            inner: Arc::new(ContentOpsInner {
                catalog: OperationCatalog::new(config.profile),
                requests: RequestBuilder::new(base_url),
                transport,
            }),
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &OperationCatalog {
        &self.inner.catalog
    }

    /// List the MCP `Tool`s exposed by the active catalog.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.inner
            .catalog
            .iter()
            .map(|op| {
                let schema_obj = op
                    .input_schema()
                    .as_object()
                    .cloned()
                    .unwrap_or_else(JsonObject::new);
                let mut tool = Tool::new(op.name(), op.description(), Arc::new(schema_obj));
                tool.annotations = Some(annotations_for_method(op.method()));
                tool
            })
            .collect()
    }

    /// Execute one operation.
    pub async fn call(&self, name: &str, arguments: Value) -> Outcome {
        let Some(op) = self.inner.catalog.get(name) else {
            let err = OpsError::UnknownOperation(name.to_string());
            warn!(operation = %name, error = %err, "unknown operation");
            return Outcome::failed(format!("Unknown operation {name}"), &err);
        };

        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                let err = OpsError::Validation("arguments must be a JSON object".to_string());
                let message = op.failure_message(&Map::new());
                warn!(operation = %name, message = %message, error = %err, "operation failed");
                return Outcome::failed(message, &err);
            }
        };

        match self.execute(op, &args).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let message = op.failure_message(&args);
                warn!(operation = %name, message = %message, error = %err, "operation failed");
                Outcome::failed(message, &err)
            }
        }
    }

    async fn execute(&self, op: &Operation, args: &Map<String, Value>) -> Result<Outcome> {
        let headers = auth::resolve(op.auth(), &Credentials::from_args(args))?;
        let request = self.inner.requests.build(op, args, headers)?;
        debug!(
            operation = %op.name(),
            method = %request.method,
            url = %redact_url(&request.url),
            "dispatching request"
        );
        let response = self.inner.transport.send(request).await?;
        debug!(operation = %op.name(), status = response.status, "received response");
        normalize::interpret(op, args, response)
    }
}

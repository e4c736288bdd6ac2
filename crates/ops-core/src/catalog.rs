//! The fixed table of exposed operations.
//!
//! Each [`OperationDef`] records the HTTP method, path template, parameter table, body
//! encoding, authorization class and failure message of one operation. The request builder,
//! the auth resolver and the response normalizer are all driven from this table.

use crate::model::{CONTENT_TYPES, OUTPUT_TYPES, SOURCE_STATUSES, SOURCE_TYPES};
use crate::semantics::HttpMethod;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

/// Which credential an operation demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthClass {
    Public,
    /// Platform administrator bearer token (`admin_token` argument).
    AdminToken,
    /// Tenant-scoped API key (`api_key` argument).
    TenantKey,
}

impl AuthClass {
    /// Name of the argument carrying the credential for this class.
    #[must_use]
    pub fn credential_param(self) -> Option<&'static str> {
        match self {
            Self::Public => None,
            Self::AdminToken => Some("admin_token"),
            Self::TenantKey => Some("api_key"),
        }
    }
}

/// Deployment-level catalog variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogProfile {
    /// Admin/tenant authorization per operation (multi-tenant governance).
    #[default]
    Governed,
    /// Every operation is public; intended for trusted/internal deployments.
    Public,
}

impl fmt::Display for CatalogProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Governed => f.write_str("governed"),
            Self::Public => f.write_str("public"),
        }
    }
}

impl FromStr for CatalogProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "governed" => Ok(Self::Governed),
            "public" => Ok(Self::Public),
            other => Err(format!(
                "unknown catalog profile '{other}' (expected 'governed' or 'public')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    None,
    Json,
    /// Form fields; multipart when a file is attached.
    Form,
}

/// Where a parameter goes in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// `{name}` placeholder in the path template.
    Path,
    /// Query-string filter.
    Query,
    /// Field of the JSON body.
    Body,
    /// The whole JSON body, supplied by the caller as an object.
    Updates,
    /// Form field.
    Form,
    /// One candidate of a mutually exclusive content choice; candidates are tried in
    /// declaration order.
    Content(ContentSlot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSlot {
    /// Local file streamed as the multipart part `file`.
    File,
    /// Plain form field named after the parameter.
    Field,
}

/// What happens when the caller leaves a parameter out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Omit,
    SendNull,
    SendEmptyObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Object,
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub location: ParamLocation,
    pub presence: Presence,
    pub kind: ParamKind,
    pub description: &'static str,
}

/// Synthetic success message for delete operations.
#[derive(Debug, Clone, Copy)]
pub struct DeletedResource {
    pub label: &'static str,
    pub id_param: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct OperationDef {
    pub name: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub auth: AuthClass,
    pub encoding: BodyEncoding,
    pub params: &'static [ParamSpec],
    /// Message template for the error envelope; `{param}` placeholders are rendered from the
    /// call arguments.
    pub failure: &'static str,
    pub deleted: Option<DeletedResource>,
}

const fn param(
    name: &'static str,
    location: ParamLocation,
    presence: Presence,
    kind: ParamKind,
    description: &'static str,
) -> ParamSpec {
    ParamSpec {
        name,
        location,
        presence,
        kind,
        description,
    }
}

const fn path_id(name: &'static str, description: &'static str) -> ParamSpec {
    param(
        name,
        ParamLocation::Path,
        Presence::Required,
        ParamKind::String,
        description,
    )
}

const fn filter(name: &'static str, values: &'static [&'static str]) -> ParamSpec {
    param(
        name,
        ParamLocation::Query,
        Presence::Omit,
        ParamKind::Choice(values),
        "Optional filter",
    )
}

const TENANT_ID: ParamSpec = path_id("tenant_id", "Tenant id");
const BRAND_ID: ParamSpec = path_id("brand_id", "Brand id");
const SOURCE_ID: ParamSpec = path_id("source_id", "Source id");
const PROMPT_ID: ParamSpec = path_id("prompt_id", "Prompt id");
const WORKER_ID: ParamSpec = path_id("worker_id", "Worker id");
const GENERATION_ID: ParamSpec = path_id("generation_id", "Generation id");

const fn updates(description: &'static str) -> ParamSpec {
    param(
        "updates",
        ParamLocation::Updates,
        Presence::Required,
        ParamKind::Object,
        description,
    )
}

const NAME: ParamSpec = param(
    "name",
    ParamLocation::Body,
    Presence::Required,
    ParamKind::String,
    "Display name",
);
const DESCRIPTION: ParamSpec = param(
    "description",
    ParamLocation::Body,
    Presence::SendNull,
    ParamKind::String,
    "Optional description (sent as null when absent)",
);
const SETTINGS: ParamSpec = param(
    "settings",
    ParamLocation::Body,
    Presence::SendEmptyObject,
    ParamKind::Object,
    "Optional settings mapping (sent as {} when absent)",
);

const fn def(
    name: &'static str,
    description: &'static str,
    method: HttpMethod,
    path: &'static str,
    encoding: BodyEncoding,
    params: &'static [ParamSpec],
    failure: &'static str,
) -> OperationDef {
    OperationDef {
        name,
        description,
        method,
        path,
        auth: AuthClass::TenantKey,
        encoding,
        params,
        failure,
        deleted: None,
    }
}

const fn get(
    name: &'static str,
    description: &'static str,
    path: &'static str,
    params: &'static [ParamSpec],
    failure: &'static str,
) -> OperationDef {
    def(
        name,
        description,
        HttpMethod::Get,
        path,
        BodyEncoding::None,
        params,
        failure,
    )
}

const fn delete(
    name: &'static str,
    description: &'static str,
    path: &'static str,
    params: &'static [ParamSpec],
    failure: &'static str,
    label: &'static str,
    id_param: &'static str,
) -> OperationDef {
    let mut op = def(
        name,
        description,
        HttpMethod::Delete,
        path,
        BodyEncoding::None,
        params,
        failure,
    );
    op.deleted = Some(DeletedResource { label, id_param });
    op
}

const fn with_auth(mut op: OperationDef, auth: AuthClass) -> OperationDef {
    op.auth = auth;
    op
}

const TENANT: &str = "/tenant/{tenant_id}";
const BRAND: &str = "/tenant/{tenant_id}/brand/{brand_id}";
const SOURCE: &str = "/tenant/{tenant_id}/brand/{brand_id}/source/{source_id}";
const GENERATIONS: &str = "/tenant/{tenant_id}/brand/{brand_id}/worker/{worker_id}/generation";

/// Every exposed operation, grouped by resource.
pub static OPERATIONS: &[OperationDef] = &[
    // Tenants
    with_auth(
        def(
            "create_tenant",
            "Create a new tenant. The response carries the api_key to use as bearer token for tenant-scoped calls.",
            HttpMethod::Post,
            "/tenant",
            BodyEncoding::Json,
            &[
                NAME,
                DESCRIPTION,
                SETTINGS,
                param(
                    "concurrency_limits",
                    ParamLocation::Body,
                    Presence::SendNull,
                    ParamKind::Object,
                    "Optional concurrency limits mapping (sent as null when absent)",
                ),
            ],
            "Failed to create tenant",
        ),
        AuthClass::Public,
    ),
    with_auth(
        get("list_tenants", "List tenants.", "/tenant", &[], "Failed to list tenants"),
        AuthClass::AdminToken,
    ),
    get(
        "get_tenant",
        "Get tenant details.",
        TENANT,
        &[TENANT_ID],
        "Failed to get tenant {tenant_id}",
    ),
    def(
        "update_tenant",
        "Update an existing tenant's details.",
        HttpMethod::Put,
        TENANT,
        BodyEncoding::Json,
        &[TENANT_ID, updates("Fields to update (sent as the JSON body)")],
        "Failed to update tenant {tenant_id}",
    ),
    delete(
        "delete_tenant",
        "Delete a tenant.",
        TENANT,
        &[TENANT_ID],
        "Failed to delete tenant {tenant_id}",
        "Tenant",
        "tenant_id",
    ),
    // Brands
    def(
        "create_brand",
        "Create a new brand for a tenant.",
        HttpMethod::Post,
        "/tenant/{tenant_id}/brand",
        BodyEncoding::Json,
        &[TENANT_ID, NAME, DESCRIPTION, SETTINGS],
        "Failed to create brand for tenant {tenant_id}",
    ),
    get(
        "list_brands",
        "List all active brands for a tenant.",
        "/tenant/{tenant_id}/brand",
        &[TENANT_ID],
        "Failed to list brands for tenant {tenant_id}",
    ),
    get(
        "get_brand",
        "Get brand details.",
        BRAND,
        &[TENANT_ID, BRAND_ID],
        "Failed to get brand {brand_id}",
    ),
    def(
        "update_brand",
        "Update brand details.",
        HttpMethod::Put,
        BRAND,
        BodyEncoding::Json,
        &[
            TENANT_ID,
            BRAND_ID,
            updates("Fields to update (sent as the JSON body)"),
        ],
        "Failed to update brand {brand_id}",
    ),
    delete(
        "delete_brand",
        "Delete a brand.",
        BRAND,
        &[TENANT_ID, BRAND_ID],
        "Failed to delete brand {brand_id}",
        "Brand",
        "brand_id",
    ),
    // Brand compass
    def(
        "trigger_brand_compass",
        "Trigger the asynchronous generation of a brand compass.",
        HttpMethod::Post,
        "/tenant/{tenant_id}/brand/{brand_id}/compass/trigger",
        BodyEncoding::None,
        &[TENANT_ID, BRAND_ID],
        "Failed to trigger brand compass for brand {brand_id}",
    ),
    get(
        "get_brand_compass",
        "Get the latest brand compass.",
        "/tenant/{tenant_id}/brand/{brand_id}/compass",
        &[TENANT_ID, BRAND_ID],
        "Failed to get brand compass for brand {brand_id}",
    ),
    // Sources
    def(
        "create_source",
        "Create a new source for a brand. Provide one of file_path, url or text (precedence in that order).",
        HttpMethod::Post,
        "/tenant/{tenant_id}/brand/{brand_id}/source",
        BodyEncoding::Form,
        &[
            TENANT_ID,
            BRAND_ID,
            param(
                "name",
                ParamLocation::Form,
                Presence::Required,
                ParamKind::String,
                "Display name",
            ),
            param(
                "source_type",
                ParamLocation::Form,
                Presence::Required,
                ParamKind::Choice(SOURCE_TYPES),
                "Kind of source",
            ),
            param(
                "content_type",
                ParamLocation::Form,
                Presence::Omit,
                ParamKind::Choice(CONTENT_TYPES),
                "Optional media kind",
            ),
            param(
                "description",
                ParamLocation::Form,
                Presence::Omit,
                ParamKind::String,
                "Optional description",
            ),
            param(
                "file_path",
                ParamLocation::Content(ContentSlot::File),
                Presence::Omit,
                ParamKind::String,
                "Local file uploaded as the source content",
            ),
            param(
                "url",
                ParamLocation::Content(ContentSlot::Field),
                Presence::Omit,
                ParamKind::String,
                "URL the remote service fetches the content from",
            ),
            param(
                "text",
                ParamLocation::Content(ContentSlot::Field),
                Presence::Omit,
                ParamKind::String,
                "Inline text content",
            ),
        ],
        "Failed to create source for brand {brand_id}",
    ),
    get(
        "list_sources",
        "List sources for a brand.",
        "/tenant/{tenant_id}/brand/{brand_id}/source",
        &[
            TENANT_ID,
            BRAND_ID,
            filter("source_type", SOURCE_TYPES),
            filter("status", SOURCE_STATUSES),
        ],
        "Failed to list sources for brand {brand_id}",
    ),
    get(
        "get_source",
        "Get source details.",
        SOURCE,
        &[TENANT_ID, BRAND_ID, SOURCE_ID],
        "Failed to get source {source_id}",
    ),
    delete(
        "delete_source",
        "Delete a source and its associated data.",
        SOURCE,
        &[TENANT_ID, BRAND_ID, SOURCE_ID],
        "Failed to delete source {source_id}",
        "Source",
        "source_id",
    ),
    def(
        "reprocess_source",
        "Trigger reprocessing of a source.",
        HttpMethod::Post,
        "/tenant/{tenant_id}/brand/{brand_id}/source/{source_id}/reprocess",
        BodyEncoding::None,
        &[TENANT_ID, BRAND_ID, SOURCE_ID],
        "Failed to reprocess source {source_id}",
    ),
    // Prompts
    def(
        "create_prompt",
        "Create a new prompt for a tenant.",
        HttpMethod::Post,
        "/tenant/{tenant_id}/prompt",
        BodyEncoding::Json,
        &[
            TENANT_ID,
            NAME,
            param(
                "content_type",
                ParamLocation::Body,
                Presence::Required,
                ParamKind::Choice(CONTENT_TYPES),
                "Media kind the prompt produces",
            ),
            param(
                "prompt_text",
                ParamLocation::Body,
                Presence::Required,
                ParamKind::String,
                "Prompt body",
            ),
            DESCRIPTION,
            SETTINGS,
        ],
        "Failed to create prompt",
    ),
    get(
        "list_prompts",
        "List all active prompts for a tenant.",
        "/tenant/{tenant_id}/prompt",
        &[TENANT_ID, filter("content_type", CONTENT_TYPES)],
        "Failed to list prompts for tenant {tenant_id}",
    ),
    get(
        "get_prompt",
        "Get prompt details.",
        "/tenant/{tenant_id}/prompt/{prompt_id}",
        &[TENANT_ID, PROMPT_ID],
        "Failed to get prompt {prompt_id}",
    ),
    def(
        "update_prompt",
        "Update prompt details.",
        HttpMethod::Put,
        "/tenant/{tenant_id}/prompt/{prompt_id}",
        BodyEncoding::Json,
        &[
            TENANT_ID,
            PROMPT_ID,
            updates("Fields to update: name, description, prompt_text, settings"),
        ],
        "Failed to update prompt {prompt_id}",
    ),
    delete(
        "delete_prompt",
        "Delete a prompt.",
        "/tenant/{tenant_id}/prompt/{prompt_id}",
        &[TENANT_ID, PROMPT_ID],
        "Failed to delete prompt {prompt_id}",
        "Prompt",
        "prompt_id",
    ),
    // Workers
    def(
        "create_worker",
        "Create a new worker for a tenant.",
        HttpMethod::Post,
        "/tenant/{tenant_id}/worker",
        BodyEncoding::Json,
        &[
            TENANT_ID,
            param(
                "output_type",
                ParamLocation::Body,
                Presence::Required,
                ParamKind::Choice(OUTPUT_TYPES),
                "Output kind",
            ),
            param(
                "prompt",
                ParamLocation::Body,
                Presence::Required,
                ParamKind::String,
                "Prompt id the worker runs",
            ),
            NAME,
            DESCRIPTION,
        ],
        "Failed to create worker",
    ),
    get(
        "list_workers",
        "List all workers for a tenant.",
        "/tenant/{tenant_id}/worker",
        &[TENANT_ID, filter("output_type", OUTPUT_TYPES)],
        "Failed to list workers for tenant {tenant_id}",
    ),
    get(
        "get_worker",
        "Get worker details.",
        "/tenant/{tenant_id}/worker/{worker_id}",
        &[TENANT_ID, WORKER_ID],
        "Failed to get worker {worker_id}",
    ),
    def(
        "update_worker",
        "Update worker details.",
        HttpMethod::Put,
        "/tenant/{tenant_id}/worker/{worker_id}",
        BodyEncoding::Json,
        &[
            TENANT_ID,
            WORKER_ID,
            updates("Fields to update: prompt, name, description"),
        ],
        "Failed to update worker {worker_id}",
    ),
    // Generations
    def(
        "create_generation",
        "Start a new generation for a brand and worker.",
        HttpMethod::Post,
        GENERATIONS,
        BodyEncoding::Json,
        &[
            TENANT_ID,
            BRAND_ID,
            WORKER_ID,
            param(
                "context",
                ParamLocation::Body,
                Presence::Omit,
                ParamKind::String,
                "Optional additional context for the generation",
            ),
        ],
        "Failed to create generation",
    ),
    get(
        "list_generations",
        "List all generations for a brand and worker.",
        GENERATIONS,
        &[TENANT_ID, BRAND_ID, WORKER_ID],
        "Failed to list generations for worker {worker_id}",
    ),
    get(
        "get_generation",
        "Get generation details.",
        "/tenant/{tenant_id}/brand/{brand_id}/worker/{worker_id}/generation/{generation_id}",
        &[TENANT_ID, BRAND_ID, WORKER_ID, GENERATION_ID],
        "Failed to get generation {generation_id}",
    ),
];

/// Placeholder rendered for ids the caller did not supply.
const MISSING: &str = "<missing>";

/// One catalog entry as seen through the active profile.
#[derive(Debug, Clone)]
pub struct Operation {
    def: &'static OperationDef,
    auth: AuthClass,
    input_schema: Value,
}

impl Operation {
    fn new(def: &'static OperationDef, profile: CatalogProfile) -> Self {
        let auth = match profile {
            CatalogProfile::Governed => def.auth,
            CatalogProfile::Public => AuthClass::Public,
        };
        let input_schema = build_input_schema(def.params, auth);
        Self {
            def,
            auth,
            input_schema,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.def.name
    }

    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.def.method
    }

    #[must_use]
    pub fn path_template(&self) -> &'static str {
        self.def.path
    }

    #[must_use]
    pub fn auth(&self) -> AuthClass {
        self.auth
    }

    #[must_use]
    pub fn encoding(&self) -> BodyEncoding {
        self.def.encoding
    }

    #[must_use]
    pub fn params(&self) -> &'static [ParamSpec] {
        self.def.params
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.def.deleted.is_some()
    }

    #[must_use]
    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Tool description, including the credential hint for the active profile.
    #[must_use]
    pub fn description(&self) -> String {
        match self.auth {
            AuthClass::Public => self.def.description.to_string(),
            AuthClass::AdminToken => format!(
                "{} Requires the admin bearer token (admin_token).",
                self.def.description
            ),
            AuthClass::TenantKey => format!(
                "{} Requires the tenant api_key as bearer token.",
                self.def.description
            ),
        }
    }

    /// Error-envelope message naming the resource id(s) involved.
    #[must_use]
    pub fn failure_message(&self, args: &Map<String, Value>) -> String {
        render_template(self.def.failure, args)
    }

    /// Fixed success message for delete operations (`None` for every other operation).
    #[must_use]
    pub fn deleted_message(&self, args: &Map<String, Value>) -> Option<String> {
        self.def.deleted.map(|d| {
            let id = arg_display(args, d.id_param).unwrap_or_else(|| MISSING.to_string());
            format!("{} {id} deleted", d.label)
        })
    }
}

/// The active operation table.
#[derive(Debug, Clone)]
pub struct OperationCatalog {
    profile: CatalogProfile,
    operations: Vec<Operation>,
}

impl OperationCatalog {
    #[must_use]
    pub fn new(profile: CatalogProfile) -> Self {
        let operations = OPERATIONS
            .iter()
            .map(|def| Operation::new(def, profile))
            .collect();
        Self {
            profile,
            operations,
        }
    }

    #[must_use]
    pub fn profile(&self) -> CatalogProfile {
        self.profile
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Render `{param}` placeholders from call arguments.
fn render_template(template: &str, args: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 1..start + len];
        out.push_str(&arg_display(args, name).unwrap_or_else(|| MISSING.to_string()));
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}

fn arg_display(args: &Map<String, Value>, name: &str) -> Option<String> {
    match args.get(name)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn build_input_schema(params: &[ParamSpec], auth: AuthClass) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<&str> = Vec::new();

    if let Some(cred) = auth.credential_param() {
        properties.insert(
            cred.to_string(),
            json!({"type": "string", "description": "Bearer token for this operation"}),
        );
        required.push(cred);
    }

    for p in params {
        let mut prop = match p.kind {
            ParamKind::String => json!({"type": "string"}),
            ParamKind::Object => json!({"type": "object"}),
            ParamKind::Choice(values) => json!({"type": "string", "enum": values}),
        };
        prop["description"] = json!(p.description);
        properties.insert(p.name.to_string(), prop);

        if p.presence == Presence::Required {
            required.push(p.name);
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn args(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn catalog_has_unique_names_and_every_placeholder_is_a_path_param() {
        let catalog = OperationCatalog::new(CatalogProfile::Governed);
        assert_eq!(catalog.len(), 29);

        let mut names = HashSet::new();
        for op in catalog.iter() {
            assert!(names.insert(op.name()), "duplicate {}", op.name());

            let path_params: Vec<&str> = op
                .params()
                .iter()
                .filter(|p| p.location == ParamLocation::Path)
                .map(|p| p.name)
                .collect();
            let placeholders: Vec<&str> = op
                .path_template()
                .split('/')
                .filter_map(|s| s.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
                .collect();
            assert_eq!(placeholders, path_params, "{}", op.name());
        }
    }

    #[test]
    fn ancestor_ids_precede_child_ids() {
        let catalog = OperationCatalog::new(CatalogProfile::Governed);
        let order = [
            "tenant_id",
            "brand_id",
            "source_id",
            "worker_id",
            "generation_id",
        ];
        for op in catalog.iter() {
            let ranks: Vec<usize> = op
                .path_template()
                .split('/')
                .filter_map(|s| s.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
                .filter_map(|p| order.iter().position(|o| *o == p))
                .collect();
            assert!(ranks.windows(2).all(|w| w[0] < w[1]), "{}", op.name());
            if op.path_template() != "/tenant" {
                assert!(op.path_template().starts_with("/tenant/{tenant_id}"));
            }
        }
    }

    #[test]
    fn governed_profile_assigns_auth_classes() {
        let catalog = OperationCatalog::new(CatalogProfile::Governed);
        assert_eq!(
            catalog.get("create_tenant").map(Operation::auth),
            Some(AuthClass::Public)
        );
        assert_eq!(
            catalog.get("list_tenants").map(Operation::auth),
            Some(AuthClass::AdminToken)
        );
        assert_eq!(
            catalog.get("get_generation").map(Operation::auth),
            Some(AuthClass::TenantKey)
        );

        let schema = catalog.get("get_tenant").expect("op").input_schema();
        let required = schema["required"].as_array().cloned().unwrap_or_default();
        assert!(required.contains(&json!("api_key")));
        assert!(required.contains(&json!("tenant_id")));
    }

    #[test]
    fn public_profile_drops_credentials_everywhere() {
        let catalog = OperationCatalog::new(CatalogProfile::Public);
        for op in catalog.iter() {
            assert_eq!(op.auth(), AuthClass::Public);
            let props = op.input_schema()["properties"]
                .as_object()
                .cloned()
                .unwrap_or_default();
            assert!(!props.contains_key("api_key"), "{}", op.name());
            assert!(!props.contains_key("admin_token"), "{}", op.name());
        }
    }

    #[test]
    fn schema_advertises_enums_and_optional_fields() {
        let catalog = OperationCatalog::new(CatalogProfile::Governed);
        let schema = catalog.get("list_sources").expect("op").input_schema();
        assert_eq!(
            schema["properties"]["status"]["enum"],
            json!(["QUEUED", "PROCESSING", "COMPLETED", "FAILED"])
        );
        let required = schema["required"].as_array().cloned().unwrap_or_default();
        assert!(!required.contains(&json!("status")));
        assert!(!required.contains(&json!("source_type")));

        assert_eq!(
            catalog.get("create_prompt").expect("op").input_schema()["properties"]["content_type"]
                ["enum"],
            json!(["VIDEO", "AUDIO", "TEXT", "IMAGE"])
        );
        assert_eq!(
            catalog.get("list_workers").expect("op").input_schema()["properties"]["output_type"]
                ["enum"],
            json!(["TEXT"])
        );

        let schema = catalog.get("create_source").expect("op").input_schema();
        assert_eq!(
            schema["properties"]["source_type"]["enum"],
            json!(["KNOWLEDGE", "GUIDELINES", "SAMPLE"])
        );
        let required = schema["required"].as_array().cloned().unwrap_or_default();
        for content in ["file_path", "url", "text"] {
            assert!(!required.contains(&json!(content)));
        }
    }

    #[test]
    fn failure_messages_name_the_target_resource() {
        let catalog = OperationCatalog::new(CatalogProfile::Governed);
        let a = args(json!({"tenant_id": "t1", "brand_id": "b2", "worker_id": "w3"}));

        let msg = |name: &str| catalog.get(name).expect("op").failure_message(&a);
        assert_eq!(msg("get_tenant"), "Failed to get tenant t1");
        assert_eq!(msg("create_brand"), "Failed to create brand for tenant t1");
        assert_eq!(
            msg("trigger_brand_compass"),
            "Failed to trigger brand compass for brand b2"
        );
        assert_eq!(
            msg("list_generations"),
            "Failed to list generations for worker w3"
        );
        assert_eq!(msg("create_prompt"), "Failed to create prompt");
        assert_eq!(msg("get_source"), "Failed to get source <missing>");
    }

    #[test]
    fn deleted_messages_only_for_delete_operations() {
        let catalog = OperationCatalog::new(CatalogProfile::Governed);
        let a = args(json!({"tenant_id": "t1", "prompt_id": "p9"}));

        let deletes: Vec<&str> = catalog
            .iter()
            .filter(|op| op.is_delete())
            .map(Operation::name)
            .collect();
        assert_eq!(
            deletes,
            vec!["delete_tenant", "delete_brand", "delete_source", "delete_prompt"]
        );

        assert_eq!(
            catalog
                .get("delete_prompt")
                .and_then(|op| op.deleted_message(&a)),
            Some("Prompt p9 deleted".to_string())
        );
        assert_eq!(
            catalog
                .get("get_prompt")
                .and_then(|op| op.deleted_message(&a)),
            None
        );
    }

    #[test]
    fn profile_parses_from_str() {
        assert_eq!("public".parse::<CatalogProfile>(), Ok(CatalogProfile::Public));
        assert_eq!(
            " Governed ".parse::<CatalogProfile>(),
            Ok(CatalogProfile::Governed)
        );
        assert!("open".parse::<CatalogProfile>().is_err());
        assert_eq!(CatalogProfile::Public.to_string(), "public");
    }
}

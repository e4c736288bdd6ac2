//! Credential resolution.
//!
//! Pure function of (authorization class, supplied credentials): no I/O, no fallback from one
//! credential class to another.

use crate::catalog::AuthClass;
use crate::error::{OpsError, Result};
use serde_json::{Map, Value};
use std::fmt;

/// Caller-supplied credentials, pulled out of the call arguments.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub admin_token: Option<String>,
    pub api_key: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Extract `admin_token` / `api_key` from call arguments. Empty strings count as absent.
    #[must_use]
    pub fn from_args(args: &Map<String, Value>) -> Self {
        let token = |name: &str| {
            args.get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            admin_token: token("admin_token"),
            api_key: token("api_key"),
        }
    }
}

/// Headers to merge into the outgoing request for `class`.
///
/// # Errors
///
/// Returns a validation error if the class demands a credential the caller did not supply.
pub fn resolve(class: AuthClass, credentials: &Credentials) -> Result<Vec<(String, String)>> {
    let token = match class {
        AuthClass::Public => return Ok(Vec::new()),
        AuthClass::AdminToken => credentials.admin_token.as_deref(),
        AuthClass::TenantKey => credentials.api_key.as_deref(),
    };
    let Some(token) = token else {
        let name = class.credential_param().unwrap_or("credential");
        return Err(OpsError::Validation(format!(
            "Missing required parameter: {name}"
        )));
    };
    Ok(vec![(
        reqwest::header::AUTHORIZATION.as_str().to_string(),
        format!("Bearer {token}"),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn creds(v: Value) -> Credentials {
        Credentials::from_args(v.as_object().expect("object"))
    }

    #[test]
    fn public_class_sends_no_headers_even_with_credentials() {
        let c = creds(json!({"api_key": "k", "admin_token": "a"}));
        assert!(resolve(AuthClass::Public, &c).expect("ok").is_empty());
    }

    #[test]
    fn tenant_key_becomes_bearer_header() {
        let c = creds(json!({"api_key": "key-1"}));
        let headers = resolve(AuthClass::TenantKey, &c).expect("ok");
        assert_eq!(
            headers,
            vec![("authorization".to_string(), "Bearer key-1".to_string())]
        );
    }

    #[test]
    fn never_substitutes_one_credential_for_another() {
        let c = creds(json!({"api_key": "key-1"}));
        let err = resolve(AuthClass::AdminToken, &c).unwrap_err();
        assert!(err.to_string().contains("admin_token"));

        let c = creds(json!({"admin_token": "adm"}));
        let err = resolve(AuthClass::TenantKey, &c).unwrap_err();
        assert!(matches!(err, OpsError::Validation(_)));
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn blank_credentials_are_missing() {
        let c = creds(json!({"api_key": "  ", "admin_token": 7}));
        assert_eq!(c, Credentials::default());
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let c = creds(json!({"api_key": "secret-key"}));
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret-key"));
        assert!(dbg.contains("<redacted>"));
    }
}

//! Credential resolution for emp-mood
//!
//! Secrets are resolved ENV → TOML. Catalog credentials are required: their
//! absence is a startup-time fatal error. The inference token is optional:
//! without it the model providers memoize an unavailable state and every
//! classifier falls back to neutral.

use emp_common::config::{resolve_secret, TomlConfig};
use emp_common::{Error, Result};
use std::fmt;

/// Environment variable for the catalog client id
pub const CLIENT_ID_ENV_VAR: &str = "SPOTIPY_CLIENT_ID";

/// Environment variable for the catalog client secret
pub const CLIENT_SECRET_ENV_VAR: &str = "SPOTIPY_CLIENT_SECRET";

/// Environment variable for the hosted inference token
pub const INFERENCE_TOKEN_ENV_VAR: &str = "EMP_INFERENCE_TOKEN";

/// Client-credentials pair for the catalog
#[derive(Clone, PartialEq, Eq)]
pub struct CatalogCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl CatalogCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for CatalogCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Resolve catalog credentials
///
/// # Errors
/// * `Error::Config` - id or secret missing from both environment and TOML
pub fn resolve_catalog_credentials(toml_config: &TomlConfig) -> Result<CatalogCredentials> {
    let catalog = &toml_config.catalog;
    let client_id = resolve_secret(
        CLIENT_ID_ENV_VAR,
        catalog.client_id.as_deref(),
        "Catalog client id",
    );
    let client_secret = resolve_secret(
        CLIENT_SECRET_ENV_VAR,
        catalog.client_secret.as_deref(),
        "Catalog client secret",
    );

    match (client_id, client_secret) {
        (Some(id), Some(secret)) => Ok(CatalogCredentials::new(id, secret)),
        (id, secret) => {
            let mut missing = Vec::new();
            if id.is_none() {
                missing.push(format!("{} ([catalog] client_id)", CLIENT_ID_ENV_VAR));
            }
            if secret.is_none() {
                missing.push(format!("{} ([catalog] client_secret)", CLIENT_SECRET_ENV_VAR));
            }
            Err(Error::Config(format!(
                "Catalog credentials not configured. Set {} in the environment or TOML config",
                missing.join(" and ")
            )))
        }
    }
}

/// Resolve the hosted inference token, if any
pub fn resolve_inference_token(toml_config: &TomlConfig) -> Option<String> {
    resolve_secret(
        INFERENCE_TOKEN_ENV_VAR,
        toml_config.inference.api_token.as_deref(),
        "Inference API token",
    )
}

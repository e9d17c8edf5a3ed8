//! Configuration types for the JSON-RPC client

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

use crate::error::ConfigError;

/// Produces a fresh request id each time it is invoked
#[derive(Clone)]
pub struct IdGenerator(Arc<dyn Fn() -> String + Send + Sync>);

impl IdGenerator {
    pub fn new(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Random UUID v4 ids
    pub fn uuid_v4() -> Self {
        Self::new(|| uuid::Uuid::new_v4().to_string())
    }

    /// `"{prefix}{n}"` with `n` counting up from zero
    pub fn sequential(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let counter = AtomicU64::new(0);
        Self::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            format!("{}{}", prefix, n)
        })
    }

    pub fn generate(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdGenerator(..)")
    }
}

/// Main client configuration
///
/// Shared by every call a client issues. Replace it through
/// [`ClientConfig::merge`], which validates before committing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// JSON-RPC endpoint
    pub url: String,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request id source; without one, calls lacking an explicit id carry no id
    #[serde(skip)]
    pub id_generator: Option<IdGenerator>,
}

/// Partial configuration; only the fields that are set are applied
#[derive(Debug, Clone, Default)]
pub struct ConfigOverride {
    pub url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub id_generator: Option<IdGenerator>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_id_generator(mut self, id_generator: IdGenerator) -> Self {
        self.id_generator = Some(id_generator);
        self
    }

    /// Check that the configuration can be used to issue calls
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }

        Url::parse(&self.url).map_err(|e| ConfigError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Apply `overrides` and validate the result.
    ///
    /// On failure `self` is left exactly as it was.
    pub fn merge(&mut self, overrides: ConfigOverride) -> Result<(), ConfigError> {
        let merged = self.merged(overrides);
        merged.validate()?;
        *self = merged;
        Ok(())
    }

    fn merged(&self, overrides: ConfigOverride) -> Self {
        let mut merged = self.clone();
        if let Some(url) = overrides.url {
            merged.url = url;
        }
        if let Some(headers) = overrides.headers {
            merged.headers = headers;
        }
        if let Some(id_generator) = overrides.id_generator {
            merged.id_generator = Some(id_generator);
        }
        merged
    }

    /// Resolve the id for a new request: explicit id, then generator, then none
    pub fn resolve_id(&self, explicit: Option<String>) -> Option<String> {
        explicit.or_else(|| self.id_generator.as_ref().map(IdGenerator::generate))
    }
}

impl ConfigOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn id_generator(mut self, id_generator: IdGenerator) -> Self {
        self.id_generator = Some(id_generator);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.headers.is_none() && self.id_generator.is_none()
    }
}

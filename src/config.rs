use crate::error::{ConfigFileError, StorageError};
use crate::storage::{self, KeyValueStore};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Local storage key holding the persisted [`TenantConfig`].
pub const SETTINGS_KEY: &str = "voicehub_settings";

pub const ENV_TENANT_SLUG: &str = "VITE_TENANT_SLUG";
pub const ENV_BOOKING_LINK: &str = "VITE_PUBLIC_BOOKING_LINK";
pub const ENV_WEBHOOK_URL: &str = "VITE_WEBHOOK_SERVICE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    pub tenant_slug: String,
    pub booking_link: String,
}

/// One source's view of the tenant config. Absent and empty values both
/// count as unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigLayer {
    pub tenant_slug: Option<String>,
    pub booking_link: Option<String>,
}

impl ConfigLayer {
    /// Reads each field on its own, so a field that isn't a string leaves
    /// its sibling intact. Anything that isn't an object yields no values.
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            tenant_slug: field("tenantSlug"),
            booking_link: field("bookingLink"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedLayer {
    pub name: &'static str,
    pub values: ConfigLayer,
}

fn first_set<'a>(mut candidates: impl Iterator<Item = Option<&'a String>>) -> String {
    candidates
        .find_map(|value| value.filter(|v| !v.is_empty()))
        .cloned()
        .unwrap_or_default()
}

/// Merges layers field by field, highest priority first. A field no layer
/// sets resolves to the empty string.
pub fn merge(layers: &[NamedLayer]) -> TenantConfig {
    TenantConfig {
        tenant_slug: first_set(layers.iter().map(|l| l.values.tenant_slug.as_ref())),
        booking_link: first_set(layers.iter().map(|l| l.values.booking_link.as_ref())),
    }
}

/// Deployment settings: the process environment laid over an optional
/// `receptionist.toml` in the user config directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub tenant_slug: Option<String>,
    pub booking_link: Option<String>,
    pub webhook_service_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Environment {
    pub fn file_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("receptionist.toml"))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            tenant_slug: non_empty(lookup(ENV_TENANT_SLUG)),
            booking_link: non_empty(lookup(ENV_BOOKING_LINK)),
            webhook_service_url: non_empty(lookup(ENV_WEBHOOK_URL)),
        }
    }

    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigFileError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Process variables first, then the settings file if there is one.
    pub fn load() -> Self {
        let process = Self::from_process();
        let Some(path) = Self::file_path() else {
            return process;
        };
        if !path.exists() {
            return process;
        }
        match Self::from_file(&path) {
            Ok(file) => process.overlay(file),
            Err(e) => {
                log::warn!("{e}");
                process
            }
        }
    }

    /// Keeps every value set here and fills the rest from `lower`.
    pub fn overlay(self, lower: Environment) -> Environment {
        Environment {
            tenant_slug: non_empty(self.tenant_slug).or(non_empty(lower.tenant_slug)),
            booking_link: non_empty(self.booking_link).or(non_empty(lower.booking_link)),
            webhook_service_url: non_empty(self.webhook_service_url)
                .or(non_empty(lower.webhook_service_url)),
        }
    }

    pub fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            tenant_slug: self.tenant_slug.clone(),
            booking_link: self.booking_link.clone(),
        }
    }

    pub fn webhook_url(&self) -> &str {
        self.webhook_service_url.as_deref().unwrap_or("")
    }
}

/// Resolves the tenant config from local storage and the environment, and
/// writes it back on save.
#[derive(Clone)]
pub struct ConfigResolver {
    store: Arc<dyn KeyValueStore>,
    env: Environment,
}

impl ConfigResolver {
    pub fn new(store: Arc<dyn KeyValueStore>, env: Environment) -> Self {
        Self { store, env }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn layers(&self) -> Vec<NamedLayer> {
        let persisted = storage::load_json::<Value>(self.store.as_ref(), SETTINGS_KEY)
            .map(|value| ConfigLayer::from_json(&value))
            .unwrap_or_default();
        vec![
            NamedLayer {
                name: "local_storage",
                values: persisted,
            },
            NamedLayer {
                name: "environment",
                values: self.env.layer(),
            },
        ]
    }

    pub fn load(&self) -> TenantConfig {
        merge(&self.layers())
    }

    /// Overwrites the persisted config as is. Callers that don't care about
    /// storage failures may drop the result.
    pub fn save(&self, config: &TenantConfig) -> Result<(), StorageError> {
        storage::save_json(self.store.as_ref(), SETTINGS_KEY, config)
    }
}

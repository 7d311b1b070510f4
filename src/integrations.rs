use crate::error::StorageError;
use crate::storage::{self, KeyValueStore};
use crate::utils::normalize_url;
use serde::{Deserialize, Serialize};
use url::Url;

pub const INTEGRATIONS_KEY: &str = "voicehub_integrations";

const TENANT_PLACEHOLDER: &str = "<slug>";

/// Voice agent and workflow identifiers kept for reference. The dashboard
/// stores them as is; wiring happens server side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationEndpoints {
    pub retell_voice_id: String,
    pub retell_agent_id: String,
    pub n8n_list_slots: String,
    pub n8n_book: String,
    pub n8n_reschedule: String,
    pub n8n_cancel: String,
}

impl IntegrationEndpoints {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        storage::load_json(store, INTEGRATIONS_KEY).unwrap_or_default()
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        storage::save_json(store, INTEGRATIONS_KEY, self)
    }
}

/// Inbound hook addresses to paste into the voice and workflow providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookUrls {
    pub retell: Url,
    pub n8n: Url,
}

impl HookUrls {
    pub fn new(backend: &str, tenant_slug: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(&normalize_url(backend))?;
        let tenant = if tenant_slug.is_empty() {
            TENANT_PLACEHOLDER
        } else {
            tenant_slug
        };
        Ok(Self {
            retell: hook_url(&base, "retell-hook", tenant)?,
            n8n: hook_url(&base, "n8n-hook", tenant)?,
        })
    }
}

fn hook_url(base: &Url, name: &str, tenant: &str) -> Result<Url, url::ParseError> {
    let path = format!("{}/{name}", base.path().trim_end_matches('/'));
    let mut url = base.join(&path)?;
    url.query_pairs_mut().clear().append_pair("tenant", tenant);
    Ok(url)
}

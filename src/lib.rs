//! Webhook notifications and tenant configuration for the AI receptionist
//! dashboard.
//!
//! [`config::ConfigResolver`] works out which tenant the dashboard acts for,
//! and [`notifier::EventNotifier`] posts one envelope per business event to
//! the configured webhook.

pub mod api;
pub mod config;
pub mod error;
pub mod integrations;
pub mod notifier;
pub mod storage;
pub mod utils;

pub use api::client::{Delivery, WebhookClient};
pub use api::events::{EventKind, WebhookEvent};
pub use config::{ConfigResolver, Environment, TenantConfig};
pub use notifier::{EventNotifier, NotifierSettings};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};

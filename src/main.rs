use receptionist_hooks::utils::block_on;
use receptionist_hooks::{
    ConfigResolver, Delivery, Environment, EventNotifier, KeyValueStore, MemoryStore,
    NotifierSettings, SqliteStore,
};
use std::process::ExitCode;
use std::sync::Arc;

fn open_store() -> Arc<dyn KeyValueStore> {
    match SqliteStore::open_default() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::warn!("local storage unavailable, using defaults only: {e}");
            Arc::new(MemoryStore::new())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let resolver = ConfigResolver::new(open_store(), Environment::load());
    let notifier = EventNotifier::new(NotifierSettings::from_resolver(&resolver));
    log::info!(
        "testing webhook for tenant {} at {:?}",
        notifier.tenant_slug(),
        notifier.webhook_url()
    );

    match block_on(notifier.test_connection()) {
        Delivery::Delivered { status } => {
            println!("Webhook test delivered ({status})");
            ExitCode::SUCCESS
        }
        Delivery::Skipped => {
            println!("Webhook URL not configured; set VITE_WEBHOOK_SERVICE_URL");
            ExitCode::from(2)
        }
        Delivery::Failed(e) => {
            println!("Webhook test failed: {e}");
            ExitCode::FAILURE
        }
    }
}

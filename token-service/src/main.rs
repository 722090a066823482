use std::sync::Arc;

use token_service::app_state::AppState;
use token_service::domain::BlacklistStore;
use token_service::services::{HashmapIdentityStore, HashsetBlacklistStore, TokenService};
use token_service::utils::env::{SEED_PASSWORD_ENV_VAR, SEED_USERNAME_ENV_VAR};
use token_service::utils::{Config, SystemClock};
use token_service::Application;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Config::from_env().expect("Failed to load config"));
    let blacklist_store: Arc<dyn BlacklistStore> = Arc::new(HashsetBlacklistStore::new());
    let token_service = Arc::new(
        TokenService::new(config.clone(), Arc::new(SystemClock), Some(blacklist_store))
            .expect("Failed to build token service"),
    );

    let identity_store = Arc::new(HashmapIdentityStore::new());
    seed_identity(&identity_store).await;

    let app_state = AppState::new(identity_store, token_service);
    let app = Application::build(app_state, config.bind_address())
        .await
        .expect("Failed to build app");

    app.run().await.expect("Failed to run app");
}

// Optional single login for local runs.
async fn seed_identity(store: &HashmapIdentityStore) {
    let (Ok(username), Ok(password)) = (
        std::env::var(SEED_USERNAME_ENV_VAR),
        std::env::var(SEED_PASSWORD_ENV_VAR),
    ) else {
        return;
    };
    match store.add_identity(&username, &password).await {
        Ok(identity) => tracing::info!(id = %identity.id, username, "seeded identity"),
        Err(e) => tracing::warn!(error = %e, "could not seed identity"),
    }
}

use std::sync::Arc;

use reqwest::{Client, Response};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::spawn;
use uuid::Uuid;

use token_service::app_router;
use token_service::app_state::AppState;
use token_service::domain::{
    ObtainTokenRequest, RefreshRequest, SlidingRefreshRequest, VerifyTokenRequest,
};
use token_service::services::{HashmapIdentityStore, HashsetBlacklistStore, TokenService};
use token_service::utils::{Config, ManualClock};

pub const T0: i64 = 1_700_000_000;
pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub address: String,
    pub http_client: Client,
    pub clock: Arc<ManualClock>,
    pub identity_store: Arc<HashmapIdentityStore>,
    pub token_service: Arc<TokenService>,
}

pub fn test_config() -> Config {
    Config::hs256("k1", b"an-hs256-secret-of-at-least-32-bytes!".to_vec())
        .expect("valid test config")
        .with_access_ttl_seconds(60)
        .with_sliding_ttl_seconds(5)
        .with_sliding_refresh_ttl_seconds(30)
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let clock = Arc::new(ManualClock::at_epoch_seconds(T0));
        let token_service = Arc::new(
            TokenService::new(
                Arc::new(config),
                clock.clone(),
                Some(Arc::new(HashsetBlacklistStore::new())),
            )
            .expect("failed to build token service"),
        );
        let identity_store = Arc::new(HashmapIdentityStore::new());
        let app_state = AppState::new(identity_store.clone(), token_service.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed binding to an ephemeral port");

        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let server = axum::serve(listener, app_router(app_state));

        spawn(async move {
            if let Err(e) = server.await {
                eprintln!("Test server error: {}", e);
            }
        });

        TestApp {
            address,
            http_client: Client::new(),
            clock,
            identity_store,
            token_service,
        }
    }

    /// Registers a fresh user and returns `(id, username)`.
    pub async fn create_user(&self) -> (String, String) {
        let username = get_random_username();
        let identity = self
            .identity_store
            .add_identity(&username, PASSWORD)
            .await
            .expect("Failed to create user");
        (identity.id, username)
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Response {
        self.http_client
            .post(&format!("{}{}", &self.address, path))
            .json(body)
            .header("Content-Type", "application/json")
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn obtain_pair(&self, username: &str, password: &str) -> Response {
        let body = ObtainTokenRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post_json("/token", &body).await
    }

    pub async fn refresh(&self, refresh: &str) -> Response {
        let body = RefreshRequest {
            refresh: refresh.to_string(),
        };
        self.post_json("/token/refresh", &body).await
    }

    pub async fn obtain_sliding(&self, username: &str, password: &str) -> Response {
        let body = ObtainTokenRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post_json("/token/sliding", &body).await
    }

    pub async fn refresh_sliding(&self, token: &str) -> Response {
        let body = SlidingRefreshRequest {
            token: token.to_string(),
        };
        self.post_json("/token/sliding/refresh", &body).await
    }

    pub async fn verify_token(&self, token: &str) -> Response {
        let body = VerifyTokenRequest {
            token: token.to_string(),
        };
        self.post_json("/token/verify", &body).await
    }

    pub async fn blacklist(&self, refresh: &str) -> Response {
        let body = RefreshRequest {
            refresh: refresh.to_string(),
        };
        self.post_json("/token/blacklist", &body).await
    }

    pub async fn whoami(&self, authorization: Option<&str>) -> Response {
        let mut request = self
            .http_client
            .get(&format!("{}/whoami", &self.address));
        if let Some(value) = authorization {
            request = request.header("Authorization", value);
        }
        request
            .send()
            .await
            .expect("Failed to execute whoami request.")
    }
}

pub fn get_random_username() -> String {
    format!("user-{}", Uuid::new_v4())
}

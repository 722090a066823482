use axum::{
    routing::{get, post},
    Router,
};
use std::{error::Error, future::Future, future::IntoFuture, pin::Pin};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use app_state::AppState;
use routes::{blacklist, obtain_pair, refresh, sliding, verify_token, whoami};

pub mod app_state;
pub mod domain;
pub mod errors;
pub mod routes;
pub mod services;
pub mod utils;

type ServerFuture = Pin<Box<dyn Future<Output = Result<(), std::io::Error>> + Send>>;

pub fn app_router(app_state: AppState) -> Router {
    Router::new()
        .route("/token", post(obtain_pair::obtain_pair))
        .route("/token/refresh", post(refresh::refresh))
        .route("/token/sliding", post(sliding::obtain_sliding))
        .route("/token/sliding/refresh", post(sliding::refresh_sliding))
        .route("/token/verify", post(verify_token::verify_token))
        .route("/token/blacklist", post(blacklist::blacklist))
        .route("/whoami", get(whoami::whoami))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

// This struct encapsulates our application-related logic.
pub struct Application {
    http_future: ServerFuture,
    // address is exposed as a public field,
    // so we have access to it in tests.
    pub address: String,
}

impl Application {
    pub async fn build(app_state: AppState, address: &str) -> Result<Self, Box<dyn Error>> {
        let router = app_router(app_state);

        let listener = TcpListener::bind(address).await?;
        // resolve port 0 to the port actually bound
        let address = listener.local_addr()?.to_string();
        let http_future = axum::serve(listener, router).into_future();

        Ok(Self {
            http_future: Box::pin(http_future),
            address: format!("http://{}", address),
        })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.http_future.await
    }
}

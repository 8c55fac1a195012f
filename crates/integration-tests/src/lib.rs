//! Integration tests for Baby Sneakers.
//!
//! Each test starts the API router on an ephemeral local port, backed by the
//! in-memory repositories, and drives it over real HTTP with the storefront
//! client. No database or SMTP server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p baby-sneakers-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use baby_sneakers_api::config::ApiConfig;
use baby_sneakers_api::services::EmailService;
use baby_sneakers_api::state::AppState;
use baby_sneakers_storefront::Storefront;
use baby_sneakers_storefront::config::StorefrontConfig;
use baby_sneakers_storefront::remote::CatalogClient;
use baby_sneakers_storefront::storage::Storage;

/// An API server running for the duration of a test.
pub struct TestServer {
    addr: SocketAddr,
    state: AppState,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with in-memory storage and no email transport.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        Self::start_with_email(None).await
    }

    /// Start a server whose email relay always succeeds or always fails.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start_with_stub_email(deliver: bool) -> Self {
        let email = EmailService::stub("noreply@babysneakers.com", "inbox@babysneakers.com", deliver);
        Self::start_with_email(Some(email)).await
    }

    async fn start_with_email(email: Option<EmailService>) -> Self {
        let state = AppState::in_memory(ApiConfig::local(), email);
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no local address");

        let app = baby_sneakers_api::app(state.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL of the running server.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Invalid server URL")
    }

    /// Shared server state, for inspecting repositories directly.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// HTTP client for the catalog API.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> CatalogClient {
        CatalogClient::new(&self.url(), None).expect("Failed to build catalog client")
    }

    /// A storefront with in-memory state talking to this server.
    #[must_use]
    pub fn storefront(&self) -> Storefront {
        Storefront::new(
            StorefrontConfig::for_api(self.url()),
            Arc::new(self.client()),
            Storage::in_memory(),
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A URL nothing listens on, for exercising offline fallbacks.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().expect("Listener has no local address");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("Invalid URL")
}

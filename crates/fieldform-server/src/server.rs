//! The runnable descriptor server.
//!
//! [`FieldformApp`] pairs [`Settings`] with a descriptor store and turns
//! them into an axum router or a listening server.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fieldform_core::Settings;
//! use fieldform_server::FieldformApp;
//! use fieldform_store::InMemoryFieldStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = FieldformApp::new(Settings::default())
//!     .store(Arc::new(InMemoryFieldStore::seeded()));
//! app.run("127.0.0.1:3000").await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use fieldform_core::{FormError, FormResult, Settings};
use fieldform_store::{open_from_settings, FieldStore};

use crate::api::{router, AppState};

/// Builder for the descriptor server.
///
/// Without an explicit [`store`](Self::store) the app opens the store the
/// settings describe when it is turned into a router.
pub struct FieldformApp {
    settings: Settings,
    store: Option<Arc<dyn FieldStore>>,
}

impl FieldformApp {
    /// Creates an app with the given settings.
    pub const fn new(settings: Settings) -> Self {
        Self {
            settings,
            store: None,
        }
    }

    /// Serves `store` instead of the one the settings describe.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn FieldStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Returns the application settings.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns `true` if a store has been supplied.
    pub const fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Builds the axum router, opening the configured store if none was
    /// supplied.
    pub async fn into_axum_router(self) -> FormResult<axum::Router> {
        let store = match self.store {
            Some(store) => store,
            None => open_from_settings(&self.settings).await?,
        };
        let state = AppState::new(store).contact_policy(self.settings.contact_policy);
        Ok(router(state))
    }

    /// Serves on `addr` until ctrl-c.
    pub async fn run(self, addr: &str) -> FormResult<()> {
        self.run_until(addr, shutdown_signal()).await
    }

    /// Serves on `addr` until `shutdown` resolves.
    pub async fn run_until(
        self,
        addr: &str,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> FormResult<()> {
        let debug = self.settings.debug;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| FormError::Configuration(format!("Failed to bind to {addr}: {e}")))?;
        let router = self.into_axum_router().await?;

        if debug {
            tracing::info!("Starting descriptor server at http://{addr}/");
        } else {
            tracing::info!(%addr, "descriptor server listening");
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| FormError::Configuration(format!("Server error: {e}")))?;

        tracing::info!("descriptor server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

impl std::fmt::Debug for FieldformApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldformApp")
            .field("has_store", &self.store.is_some())
            .field("bind_addr", &self.settings.bind_addr)
            .field("debug", &self.settings.debug)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldform_store::InMemoryFieldStore;

    #[test]
    fn test_app_new() {
        let app = FieldformApp::new(Settings::default());
        assert!(!app.has_store());
        assert!(app.settings().debug);
    }

    #[test]
    fn test_app_with_store() {
        let app = FieldformApp::new(Settings::default())
            .store(Arc::new(InMemoryFieldStore::seeded()));
        assert!(app.has_store());
    }

    #[test]
    fn test_app_debug() {
        let app = FieldformApp::new(Settings::default());
        let debug = format!("{app:?}");
        assert!(debug.contains("FieldformApp"));
        assert!(debug.contains("has_store"));
    }

    #[tokio::test]
    async fn test_into_axum_router_opens_configured_store() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            data_file: Some(dir.path().join("fields.json")),
            ..Settings::default()
        };
        let _router = FieldformApp::new(settings).into_axum_router().await.unwrap();
        assert!(dir.path().join("fields.json").exists());
    }

    #[tokio::test]
    async fn test_run_invalid_address() {
        let app = FieldformApp::new(Settings::default());
        let result = app.run("invalid-address").await;
        assert!(matches!(result, Err(FormError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown() {
        let app = FieldformApp::new(Settings::default())
            .store(Arc::new(InMemoryFieldStore::seeded()));
        app.run_until("127.0.0.1:0", async {}).await.unwrap();
    }
}

//! Shared, lazily constructed client handle.
//!
//! The handle is owned by the tool registry and cloned into whatever needs
//! it. The underlying client is built on first use, at most once even when
//! many invocations race on that first use. A failed build is not cached, so
//! a later call can retry after the configuration is fixed.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use super::api::BitableApi;
use super::client::LarkClient;
use super::error::ClientError;
use crate::core::config::Config;

type ClientFactory = dyn Fn() -> Result<Arc<dyn BitableApi>, ClientError> + Send + Sync;

/// Cloneable handle to the single shared [`BitableApi`] instance.
#[derive(Clone)]
pub struct ClientHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    client: OnceCell<Arc<dyn BitableApi>>,
    factory: Box<ClientFactory>,
}

impl ClientHandle {
    /// Handle that builds a [`LarkClient`] from `config` on first use.
    pub fn from_config(config: Arc<Config>) -> Self {
        Self::with_factory(move || {
            let client = LarkClient::new(&config)?;
            Ok(Arc::new(client) as Arc<dyn BitableApi>)
        })
    }

    /// Handle that builds its client with `factory` on first use.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn BitableApi>, ClientError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(HandleInner {
                client: OnceCell::new(),
                factory: Box::new(factory),
            }),
        }
    }

    /// Handle around an already constructed client.
    pub fn from_client(client: Arc<dyn BitableApi>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                client: OnceCell::new_with(Some(client.clone())),
                factory: Box::new(move || Ok(client.clone())),
            }),
        }
    }

    /// Get the shared client, constructing it if this is the first use.
    pub async fn get(&self) -> Result<Arc<dyn BitableApi>, ClientError> {
        self.inner
            .client
            .get_or_try_init(|| async {
                info!("Constructing Feishu client");
                (self.inner.factory)()
            })
            .await
            .map(Arc::clone)
    }

    /// Whether the client has been constructed yet.
    pub fn is_initialized(&self) -> bool {
        self.inner.client.initialized()
    }
}

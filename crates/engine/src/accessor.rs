//! Lazily constructed, process-wide engine client handle

use crate::error::EngineError;
use crate::http::HttpEngineClient;
use crate::EngineClient;
use searchgate_core::EngineConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Builds a client handle from configuration
pub type ClientFactory =
    Arc<dyn Fn(&EngineConfig) -> Result<Arc<dyn EngineClient>, EngineError> + Send + Sync>;

/// Shared accessor for the engine client
///
/// The first successful [`get_client`](Self::get_client) call constructs the
/// handle; later calls reuse it. A failed construction is returned to the
/// caller and retried on the next call, so a bad handle is never cached.
pub struct EngineClientAccessor {
    config: EngineConfig,
    factory: ClientFactory,
    client: OnceCell<Arc<dyn EngineClient>>,
}

impl EngineClientAccessor {
    /// Accessor producing an [`HttpEngineClient`] for `config.url`
    pub fn new(config: EngineConfig) -> Self {
        let factory: ClientFactory = Arc::new(|config: &EngineConfig| {
            HttpEngineClient::new(config).map(|c| Arc::new(c) as Arc<dyn EngineClient>)
        });
        Self::with_factory(config, factory)
    }

    /// Accessor using a custom construction function
    pub fn with_factory(config: EngineConfig, factory: ClientFactory) -> Self {
        Self {
            config,
            factory,
            client: OnceCell::new(),
        }
    }

    /// Accessor that is already initialized with `client`
    pub fn with_client(client: Arc<dyn EngineClient>) -> Self {
        let factory: ClientFactory = Arc::new(|_: &EngineConfig| {
            Err(EngineError::ClientInit(
                "pre-initialized accessor has no factory".to_string(),
            ))
        });
        Self {
            config: EngineConfig::default(),
            factory,
            client: OnceCell::from(client),
        }
    }

    /// Get the shared client, constructing it on first use
    pub async fn get_client(&self) -> Result<Arc<dyn EngineClient>, EngineError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                debug!("Constructing engine client for {}", self.config.url);
                match (self.factory)(&self.config) {
                    Ok(client) => {
                        info!("Engine client initialized for {}", self.config.url);
                        Ok(client)
                    }
                    Err(e) => {
                        warn!("Engine client construction failed: {e}");
                        Err(e)
                    }
                }
            })
            .await?;
        Ok(Arc::clone(client))
    }

    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Poll the engine until a ping succeeds or `timeout` elapses
pub async fn wait_for_engine(
    accessor: &EngineClientAccessor,
    timeout: Duration,
    interval: Duration,
) -> Result<(), EngineError> {
    info!("Waiting for engine at {} to become reachable...", accessor.config().url);

    let start = Instant::now();

    loop {
        let attempt = match accessor.get_client().await {
            Ok(client) => client.ping().await,
            Err(e) => Err(e),
        };

        let last_error = match attempt {
            Ok(_) => {
                info!("Engine is reachable");
                return Ok(());
            }
            // Retrying cannot fix a bad address
            Err(e @ EngineError::ClientInit(_)) => return Err(e),
            Err(e) => e.to_string(),
        };

        if start.elapsed() >= timeout {
            return Err(EngineError::Unavailable {
                waited_secs: timeout.as_secs(),
                last_error,
            });
        }

        sleep(interval).await;
    }
}

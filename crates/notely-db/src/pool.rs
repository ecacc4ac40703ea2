//! Database connection pool management.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use notely_core::{Error, Result};

/// Default maximum number of connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// How long a caller waits for a free connection before giving up.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle connections are closed after this long.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Pool sizing and timeouts.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// Connections kept open once the pool is established.
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: 1,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

/// Open a PostgreSQL pool for the note store.
pub async fn connect_pool(database_url: &str, config: &PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(database_url)
        .await
        .map_err(|e| {
            warn!(
                subsystem = "db",
                component = "pool",
                op = "connect",
                error = %e,
                "Could not reach note store"
            );
            Error::Database(e)
        })?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        pool_size = pool.size(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Note store connected"
    );
    Ok(pool)
}

/// Process-wide connection handle that connects on first use.
///
/// Cloning shares the same underlying cell. Concurrent first callers await a
/// single connection attempt; a failed attempt leaves the cell empty so the
/// next caller retries.
#[derive(Clone)]
pub struct LazyPool {
    inner: Arc<LazyPoolInner>,
}

struct LazyPoolInner {
    database_url: String,
    config: PoolConfig,
    cell: OnceCell<PgPool>,
}

impl LazyPool {
    /// Create an unconnected handle.
    pub fn new(database_url: impl Into<String>, config: PoolConfig) -> Self {
        Self {
            inner: Arc::new(LazyPoolInner {
                database_url: database_url.into(),
                config,
                cell: OnceCell::new(),
            }),
        }
    }

    /// Wrap an already-connected pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            inner: Arc::new(LazyPoolInner {
                database_url: String::new(),
                config: PoolConfig::default(),
                cell: OnceCell::new_with(Some(pool)),
            }),
        }
    }

    /// Get the pool, connecting if this is the first use.
    pub async fn get(&self) -> Result<&PgPool> {
        let inner = &self.inner;
        inner
            .cell
            .get_or_try_init(|| connect_pool(&inner.database_url, &inner.config))
            .await
    }

    /// Whether a connection has been established.
    pub fn is_initialized(&self) -> bool {
        self.inner.cell.initialized()
    }
}

impl std::fmt::Debug for LazyPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyPool")
            .field("initialized", &self.is_initialized())
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_builder() {
        let config = PoolConfig::new()
            .max_connections(20)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(60));

        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(60));
        assert_eq!(config.idle_timeout, DEFAULT_IDLE_TIMEOUT);
    }

    #[test]
    fn test_lazy_pool_starts_unconnected() {
        let pool = LazyPool::new("postgres://localhost/notely", PoolConfig::default());
        assert!(!pool.is_initialized());
        assert!(!pool.clone().is_initialized());
    }

    #[tokio::test]
    async fn test_lazy_pool_failed_connect_stays_uninitialized() {
        let config = PoolConfig::new()
            .min_connections(0)
            .acquire_timeout(Duration::from_millis(200));
        let pool = LazyPool::new("postgres://notely@127.0.0.1:1/unreachable", config);

        assert!(pool.get().await.is_err());
        assert!(!pool.is_initialized());
    }
}

//! # notely-db
//!
//! PostgreSQL database layer for notely.
//!
//! This crate provides:
//! - A lazily connected, process-wide connection pool
//! - The PostgreSQL note repository
//! - SQL rendering of note listing filters
//! - An in-memory note repository for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use notely_db::{CreateNoteRequest, Database, NewNote, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect_lazy("postgres://localhost/notely", Default::default());
//!
//!     let note = db.notes.insert(NewNote::try_from(CreateNoteRequest {
//!         title: Some("Hello".to_string()),
//!         content: Some("Hello, world!".to_string()),
//!         tags: Some(vec!["greeting".to_string()]),
//!         category: None,
//!     })?).await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```
pub mod filter;
pub mod memory;
pub mod notes;
pub mod pool;

// Re-export core types
pub use notely_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use filter::{NoteFilterQueryBuilder, QueryParam};
pub use memory::MemoryNoteRepository;
pub use notes::PgNoteRepository;
pub use pool::{connect_pool, LazyPool, PoolConfig};

/// Database handle bundling the pool and repositories.
#[derive(Clone, Debug)]
pub struct Database {
    /// The shared, lazily connected pool.
    pub pool: LazyPool,
    /// Note repository.
    pub notes: PgNoteRepository,
}

impl Database {
    /// Create a Database on top of an existing pool handle.
    pub fn new(pool: LazyPool) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a Database that connects on its first query.
    pub fn connect_lazy(url: &str, config: PoolConfig) -> Self {
        Self::new(LazyPool::new(url, config))
    }

    /// Create a Database by connecting to the given URL immediately.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = connect_pool(url, &PoolConfig::default()).await?;
        Ok(Self::new(LazyPool::from_pool(pool)))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(self.pool.get().await?)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }
}

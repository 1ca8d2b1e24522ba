//! Transaction store with connection pooling and live feeds
//!
//! Per-user transaction records live in SQLite behind an r2d2 pool. Change
//! notification is a version counter on a watch channel per user: every
//! successful write bumps the version, and each subscriber wake-up reloads
//! the complete current set (emissions are full sets, never diffs).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tokio::sync::watch;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::Transaction;

mod transactions;


pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
///
/// Stored as "YYYY-MM-DD HH:MM:SS" in UTC.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Format a DateTime<Utc> the way the store persists it
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Transaction store wrapper with pooling and per-user feeds
#[derive(Clone)]
pub struct TransactionStore {
    pool: DbPool,
    db_path: String,
    feeds: Arc<Mutex<HashMap<String, watch::Sender<u64>>>>,
}

impl TransactionStore {
    /// Open (or create) a store at the given path and run migrations
    pub fn open(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let store = Self {
            pool,
            db_path: path.to_string(),
            feeds: Arc::new(Mutex::new(HashMap::new())),
        };
        store.run_migrations()?;

        Ok(store)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway store (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` because each pooled
    /// connection would otherwise see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("fluxo_test_{}.db", id));
        let path = path.to_string_lossy().to_string();

        let _ = std::fs::remove_file(&path);

        Self::open(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Subscribe to the live feed for a user
    ///
    /// The first `recv` resolves immediately with the current set; later
    /// calls wait for a change. Rapid consecutive writes may coalesce into a
    /// single emission; every emission is the complete current set.
    pub fn subscribe(&self, user_id: &str) -> Result<TransactionFeed> {
        let rx = {
            let mut feeds = self
                .feeds
                .lock()
                .map_err(|_| Error::Subscription("feed registry poisoned".to_string()))?;
            feeds
                .entry(user_id.to_string())
                .or_insert_with(|| watch::channel(0).0)
                .subscribe()
        };

        Ok(TransactionFeed {
            store: self.clone(),
            user_id: user_id.to_string(),
            rx,
            initial: true,
        })
    }

    /// Bump the feed version for a user after a committed write
    fn notify(&self, user_id: &str) {
        if let Ok(feeds) = self.feeds.lock() {
            if let Some(sender) = feeds.get(user_id) {
                sender.send_modify(|version| *version += 1);
            }
        }
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block the enrichment write-backs
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Transactions (per-user statement records)
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                raw_description TEXT NOT NULL,
                amount REAL NOT NULL,
                date DATETIME NOT NULL,
                kind TEXT NOT NULL,
                category TEXT,
                clean_description TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

/// Live feed of a user's complete transaction set
///
/// Emissions carry no ordering guarantee; display layers sort by date.
pub struct TransactionFeed {
    store: TransactionStore,
    user_id: String,
    rx: watch::Receiver<u64>,
    initial: bool,
}

impl TransactionFeed {
    /// Wait for the next emission and return the complete current set
    pub async fn recv(&mut self) -> Result<Vec<Transaction>> {
        if self.initial {
            self.initial = false;
        } else {
            self.rx
                .changed()
                .await
                .map_err(|_| Error::Subscription("feed closed".to_string()))?;
        }
        self.store.list(&self.user_id)
    }

    /// The user this feed belongs to
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

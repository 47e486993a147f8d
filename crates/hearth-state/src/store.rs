//! redb-backed namespace store for operational data.
//!
//! One redb table per opened [`Category`]. Keys and values are plain
//! strings; the store never interprets either. Writes go through a write
//! transaction each, reads and scans run on a read snapshot and do not see
//! writes committed after they began.

use std::path::Path;
use std::sync::Arc;

use hearth_core::Category;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::scan::ScanIter;
use crate::tables::table_for;

/// File name of the database inside the data directory.
pub const DB_FILE: &str = "operational.redb";

/// Convert any `Display` error into `StoreUnavailable` tagged with the
/// operation that failed.
macro_rules! unavailable {
    ($op:literal) => {
        |e| StateError::StoreUnavailable {
            op: $op,
            reason: e.to_string(),
        }
    };
}

/// Thread-safe operational store backed by redb.
///
/// Cloning is cheap and every clone shares the same database. The file is
/// released once the last clone is dropped or closed.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
    namespaces: Vec<Category>,
}

impl Store {
    /// Open (or create) the store in `dir`, creating any missing
    /// namespaces. Existing data is left untouched.
    pub fn open(dir: &Path, namespaces: &[Category]) -> StateResult<Self> {
        std::fs::create_dir_all(dir).map_err(unavailable!("create data dir"))?;
        let path = dir.join(DB_FILE);
        let db = Database::create(&path).map_err(unavailable!("open"))?;
        let store = Self::from_database(db, namespaces)?;
        debug!(?path, namespaces = ?store.namespaces, "operational store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory(namespaces: &[Category]) -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(unavailable!("open"))?;
        let store = Self::from_database(db, namespaces)?;
        debug!(namespaces = ?store.namespaces, "in-memory operational store opened");
        Ok(store)
    }

    fn from_database(db: Database, namespaces: &[Category]) -> StateResult<Self> {
        let mut namespaces = namespaces.to_vec();
        namespaces.sort_unstable();
        namespaces.dedup();
        let store = Self {
            db: Arc::new(db),
            namespaces,
        };
        store.ensure_namespaces()?;
        Ok(store)
    }

    /// Create the namespace tables if they don't exist yet.
    fn ensure_namespaces(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(unavailable!("begin write"))?;
        // Opening a table in a write transaction creates it if absent.
        for namespace in &self.namespaces {
            txn.open_table(table_for(*namespace))
                .map_err(unavailable!("create namespace"))?;
        }
        txn.commit().map_err(unavailable!("commit"))?;
        Ok(())
    }

    /// Namespaces opened on this handle, in category order.
    pub fn namespaces(&self) -> &[Category] {
        &self.namespaces
    }

    pub(crate) fn table(
        &self,
        namespace: Category,
    ) -> StateResult<TableDefinition<'static, &'static str, &'static str>> {
        if self.namespaces.contains(&namespace) {
            Ok(table_for(namespace))
        } else {
            Err(StateError::NamespaceNotOpen(namespace))
        }
    }

    /// Insert or overwrite `key` in `namespace`.
    pub fn put(&self, namespace: Category, key: &str, value: &str) -> StateResult<()> {
        let table_def = self.table(namespace)?;
        let txn = self.db.begin_write().map_err(unavailable!("begin write"))?;
        {
            let mut table = txn.open_table(table_def).map_err(unavailable!("open table"))?;
            table.insert(key, value).map_err(unavailable!("write"))?;
        }
        txn.commit().map_err(unavailable!("commit"))?;
        debug!(%namespace, %key, "record stored");
        Ok(())
    }

    /// Insert or overwrite many entries in a single transaction. Returns
    /// the number of entries written.
    pub fn put_batch<'a, I>(&self, namespace: Category, entries: I) -> StateResult<usize>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let table_def = self.table(namespace)?;
        let txn = self.db.begin_write().map_err(unavailable!("begin write"))?;
        let mut count = 0;
        {
            let mut table = txn.open_table(table_def).map_err(unavailable!("open table"))?;
            for (key, value) in entries {
                table.insert(key, value).map_err(unavailable!("write"))?;
                count += 1;
            }
        }
        txn.commit().map_err(unavailable!("commit"))?;
        debug!(%namespace, count, "batch stored");
        Ok(count)
    }

    /// Point lookup.
    pub fn get(&self, namespace: Category, key: &str) -> StateResult<Option<String>> {
        let table_def = self.table(namespace)?;
        let txn = self.db.begin_read().map_err(unavailable!("begin read"))?;
        let table = txn.open_table(table_def).map_err(unavailable!("open table"))?;
        let value = table
            .get(key)
            .map_err(unavailable!("read"))?
            .map(|guard| guard.value().to_string());
        Ok(value)
    }

    /// Delete `key`. Returns true if it existed.
    pub fn remove(&self, namespace: Category, key: &str) -> StateResult<bool> {
        let table_def = self.table(namespace)?;
        let txn = self.db.begin_write().map_err(unavailable!("begin write"))?;
        let existed;
        {
            let mut table = txn.open_table(table_def).map_err(unavailable!("open table"))?;
            existed = table.remove(key).map_err(unavailable!("write"))?.is_some();
        }
        txn.commit().map_err(unavailable!("commit"))?;
        debug!(%namespace, %key, existed, "record removed");
        Ok(existed)
    }

    /// Number of records in `namespace`.
    pub fn len(&self, namespace: Category) -> StateResult<u64> {
        let table_def = self.table(namespace)?;
        let txn = self.db.begin_read().map_err(unavailable!("begin read"))?;
        let table = txn.open_table(table_def).map_err(unavailable!("open table"))?;
        table.len().map_err(unavailable!("read"))
    }

    /// Lazily iterate `namespace` in key order, starting at the first key
    /// `>= start`. The iterator owns its own read snapshot.
    pub fn scan_from(&self, namespace: Category, start: &str) -> StateResult<ScanIter> {
        let table_def = self.table(namespace)?;
        let txn = self.db.begin_read().map_err(unavailable!("begin read"))?;
        let table = txn.open_table(table_def).map_err(unavailable!("open table"))?;
        let range = table.range(start..).map_err(unavailable!("seek"))?;
        Ok(ScanIter::new(namespace, range))
    }

    /// Release this handle.
    pub fn close(self) {
        let shared = Arc::strong_count(&self.db) - 1;
        drop(self);
        debug!(other_handles = shared, "operational store handle closed");
    }
}

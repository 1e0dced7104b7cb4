use crate::domain::ports::SnapshotStorage;
use crate::error::{CartError, Result};
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing cart snapshots.
pub const CF_SNAPSHOTS: &str = "snapshots";

/// A persistent snapshot store using RocksDB.
///
/// Snapshots live in their own Column Family keyed by the raw storage key.
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbSnapshotStorage {
    db: Arc<DB>,
}

impl RocksDbSnapshotStorage {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "snapshots" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_snapshots = ColumnFamilyDescriptor::new(CF_SNAPSHOTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_snapshots])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn snapshots(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_SNAPSHOTS).ok_or_else(|| {
            CartError::Internal(Box::new(std::io::Error::other(
                "Snapshots column family not found",
            )))
        })
    }
}

impl SnapshotStorage for RocksDbSnapshotStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let cf = self.snapshots()?;
        let Some(bytes) = self.db.get_cf(cf, key.as_bytes())? else {
            return Ok(None);
        };

        String::from_utf8(bytes).map(Some).map_err(|e| {
            CartError::Internal(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Snapshot is not valid UTF-8: {}", e),
            )))
        })
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let cf = self.snapshots()?;
        self.db.put_cf(cf, key.as_bytes(), value.as_bytes())?;
        Ok(())
    }
}

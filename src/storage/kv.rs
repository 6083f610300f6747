use crate::error::{Result, StoreError};
use crate::types::{StoreConfig, StoreMode};
use sled::{Db, Tree};

const META_TREE: &str = "__meta";
const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Thin wrapper around the sled database: tree handles, the schema
/// version stamp and the per-collection id counters live here. Everything
/// above it speaks records; this layer speaks bytes.
pub struct KvStore {
    db: Db,
    meta: Tree,
}

impl KvStore {
    /// Opens (or creates) the database at the configured path.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if config.create_dirs {
            if let Some(parent) = config.db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let mode = match config.mode {
            StoreMode::HighThroughput => sled::Mode::HighThroughput,
            StoreMode::LowSpace => sled::Mode::LowSpace,
        };

        let db = sled::Config::new()
            .path(&config.db_path)
            .cache_capacity((config.cache_capacity_mb * 1024 * 1024) as u64)
            .flush_every_ms(config.flush_interval_ms)
            .mode(mode)
            .open()?;

        let meta = db.open_tree(META_TREE)?;

        Ok(Self { db, meta })
    }

    /// Opens a named tree, creating it if absent.
    pub fn tree(&self, name: &str) -> Result<Tree> {
        Ok(self.db.open_tree(name)?)
    }

    pub fn schema_version(&self) -> Result<Option<u32>> {
        Ok(self
            .meta
            .get(SCHEMA_VERSION_KEY)?
            .map(|ivec| decode_u32(&ivec)))
    }

    pub fn set_schema_version(&self, version: u32) -> Result<()> {
        self.meta
            .insert(SCHEMA_VERSION_KEY, version.to_be_bytes().to_vec())?;
        Ok(())
    }

    /// Next primary key for a collection: strictly increasing, never
    /// reused, even across deletes and reopens.
    pub fn next_id(&self, collection: &str) -> Result<u64> {
        let key = format!("seq:{}", collection);
        let bytes = self.meta.update_and_fetch(key.as_bytes(), |old| {
            let next = old.map(decode_u64).unwrap_or(0) + 1;
            Some(next.to_be_bytes().to_vec())
        })?;

        match bytes {
            Some(ivec) => Ok(decode_u64(&ivec)),
            None => Err(StoreError::InvalidKey(format!(
                "id counter missing for collection '{}'",
                collection
            ))),
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl Drop for KvStore {
    fn drop(&mut self) {
        if let Err(e) = self.db.flush() {
            log::error!("error flushing database: {}", e);
        }
    }
}

/// Records and secondary index entries share one tree per collection,
/// namespaced by key prefix, so a single tree transaction covers both.
pub const RECORD_PREFIX: &[u8] = b"r:";

/// Record key: `r:` followed by the big-endian id, so a prefix scan
/// yields records in id order.
pub fn record_key(id: u64) -> [u8; 10] {
    let mut key = [0u8; 10];
    key[..2].copy_from_slice(RECORD_PREFIX);
    key[2..].copy_from_slice(&id.to_be_bytes());
    key
}

/// Secondary index entry key: `i:<field>:` followed by the big-endian
/// indexed value, then the record id. Prefix scans on
/// [`index_prefix`] find every matching record.
pub fn index_key(field: &str, value: u64, id: u64) -> Vec<u8> {
    let mut key = index_prefix(field, value);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// Common prefix of every index entry for one (field, value) pair.
pub fn index_prefix(field: &str, value: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(field.len() + 11);
    key.extend_from_slice(b"i:");
    key.extend_from_slice(field.as_bytes());
    key.push(b':');
    key.extend_from_slice(&value.to_be_bytes());
    key
}

pub fn decode_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let len = bytes.len().min(8);
    buf[8 - len..].copy_from_slice(&bytes[..len]);
    u64::from_be_bytes(buf)
}

fn decode_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    let len = bytes.len().min(4);
    buf[4 - len..].copy_from_slice(&bytes[..len]);
    u32::from_be_bytes(buf)
}

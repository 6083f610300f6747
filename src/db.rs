use crate::error::{Result, StoreError};
use crate::schema::{self, SCHEMA_VERSION};
use crate::storage::{KvStore, RECORD_PREFIX, decode_u64, index_key, index_prefix, record_key};
use crate::types::{Record, StoreConfig, Value};
use log::debug;
use sled::transaction::{ConflictableTransactionError, ConflictableTransactionResult, TransactionalTree};
use std::collections::HashMap;
use std::path::Path;

// Index entries carry no payload, the key is the data.
const EMPTY: &[u8] = &[];

struct CollectionHandle {
    tree: sled::Tree,
    /// Fields with a secondary index, empty for most collections.
    indexes: &'static [&'static str],
}

impl CollectionHandle {
    /// Runs `op` as one storage transaction over the collection's tree,
    /// which holds both records and index entries: either every write
    /// commits or none do.
    fn transaction<F>(&self, op: F) -> Result<()>
    where
        F: Fn(&TransactionalTree) -> ConflictableTransactionResult<(), StoreError>,
    {
        self.tree.transaction(op).map_err(StoreError::from)
    }
}

/// The database handle. Constructed once at startup and injected into
/// whatever consumes it; there is no ambient global handle, so no
/// operation can run against a database that has not finished opening.
///
/// Every operation runs as its own storage transaction scoped to the
/// collection it touches. Failures propagate as [`StoreError`] and leave
/// the stored state, index entries included, as it was before the
/// failing operation.
pub struct Database {
    store: KvStore,
    collections: HashMap<String, CollectionHandle>,
}

impl Database {
    /// Opens (or creates) a database at the given path with default
    /// configuration.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(StoreConfig::with_path(path))
    }

    /// Opens (or creates) a database and ensures the schema exists.
    ///
    /// On a fresh database the three collection trees are created and
    /// the schema version stamped. A database already at the current
    /// version is opened as-is; there is no migration path beyond
    /// create-if-absent.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        let store = KvStore::open(&config)?;
        let needs_init = match store.schema_version()? {
            Some(version) if version >= SCHEMA_VERSION => false,
            _ => true,
        };

        let mut collections = HashMap::new();
        for def in schema::COLLECTIONS {
            let tree = store.tree(def.name)?;
            collections.insert(
                def.name.to_string(),
                CollectionHandle {
                    tree,
                    indexes: def.indexes,
                },
            );
        }

        if needs_init {
            store.set_schema_version(SCHEMA_VERSION)?;
            debug!("schema initialized at version {}", SCHEMA_VERSION);
        }

        Ok(Self { store, collections })
    }

    fn handle(&self, collection: &str) -> Result<&CollectionHandle> {
        self.collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))
    }

    /// Inserts a record, assigning the next primary key for the
    /// collection. Any id already on the record is replaced. The record
    /// and its index entries commit atomically.
    pub async fn insert(&self, collection: &str, mut record: Record) -> Result<u64> {
        let handle = self.handle(collection)?;
        let id = self.store.next_id(collection)?;
        record.id = Some(id);

        let key = record_key(id);
        let bytes = serde_json::to_vec(&record)?;
        let entries: Vec<Vec<u8>> = handle
            .indexes
            .iter()
            .filter_map(|field| {
                record
                    .get(field)
                    .and_then(Value::as_u64)
                    .map(|value| index_key(field, value, id))
            })
            .collect();

        handle.transaction(|tree| {
            tree.insert(&key[..], &bytes[..])?;
            for entry in &entries {
                tree.insert(&entry[..], EMPTY)?;
            }
            Ok(())
        })?;

        debug!("inserted id {} into {}", id, collection);
        Ok(id)
    }

    /// Point lookup by primary key.
    pub async fn get(&self, collection: &str, id: u64) -> Result<Option<Record>> {
        let handle = self.handle(collection)?;
        match handle.tree.get(record_key(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Every record in the collection, in id order. No filtering, no
    /// pagination.
    pub async fn get_all(&self, collection: &str) -> Result<Vec<Record>> {
        self.scan(collection)?.collect()
    }

    /// Cursor over a collection, yielding one record at a time in id
    /// order. Same contents as [`get_all`](Self::get_all); callers that
    /// render incrementally use this instead of buffering.
    pub fn scan(&self, collection: &str) -> Result<RecordCursor> {
        let handle = self.handle(collection)?;
        Ok(RecordCursor {
            inner: handle.tree.scan_prefix(RECORD_PREFIX),
        })
    }

    /// Replaces the stored record with the given one, matched by the id
    /// the record carries. Inserting-if-absent is part of the contract:
    /// an update against a missing id creates the record (upsert). The
    /// replacement and any index entry changes commit atomically.
    pub async fn update(&self, collection: &str, record: Record) -> Result<()> {
        let handle = self.handle(collection)?;
        let id = record.id.ok_or_else(|| {
            StoreError::InvalidOperation("update requires a record with a primary key".to_string())
        })?;

        let key = record_key(id);
        let bytes = serde_json::to_vec(&record)?;
        let new_values: Vec<Option<u64>> = handle
            .indexes
            .iter()
            .map(|field| record.get(field).and_then(Value::as_u64))
            .collect();

        handle.transaction(|tree| {
            let previous = match tree.get(&key[..])? {
                Some(ivec) => Some(
                    serde_json::from_slice::<Record>(&ivec)
                        .map_err(|e| ConflictableTransactionError::Abort(StoreError::from(e)))?,
                ),
                None => None,
            };

            tree.insert(&key[..], &bytes[..])?;
            for (field, new) in handle.indexes.iter().copied().zip(new_values.iter().copied()) {
                let old = previous
                    .as_ref()
                    .and_then(|r| r.get(field))
                    .and_then(Value::as_u64);
                if old != new {
                    if let Some(value) = old {
                        tree.remove(&index_key(field, value, id)[..])?;
                    }
                    if let Some(value) = new {
                        tree.insert(&index_key(field, value, id)[..], EMPTY)?;
                    }
                }
            }
            Ok(())
        })?;

        debug!("updated id {} in {}", id, collection);
        Ok(())
    }

    /// Removes a record and its index entries by primary key, in one
    /// transaction. Deleting an absent id is a successful no-op.
    pub async fn delete(&self, collection: &str, id: u64) -> Result<()> {
        let handle = self.handle(collection)?;
        let key = record_key(id);

        handle.transaction(|tree| {
            let previous = match tree.get(&key[..])? {
                Some(ivec) => serde_json::from_slice::<Record>(&ivec)
                    .map_err(|e| ConflictableTransactionError::Abort(StoreError::from(e)))?,
                None => return Ok(()),
            };

            for field in handle.indexes.iter().copied() {
                if let Some(value) = previous.get(field).and_then(Value::as_u64) {
                    tree.remove(&index_key(field, value, id)[..])?;
                }
            }
            tree.remove(&key[..])?;
            Ok(())
        })?;

        debug!("deleted id {} from {}", id, collection);
        Ok(())
    }

    /// Point lookup through a secondary index: every record whose
    /// indexed field equals `value`, in id order.
    pub async fn find_by_index(
        &self,
        collection: &str,
        field: &str,
        value: u64,
    ) -> Result<Vec<Record>> {
        let handle = self.handle(collection)?;
        if !handle.indexes.contains(&field) {
            return Err(StoreError::IndexNotFound(
                collection.to_string(),
                field.to_string(),
            ));
        }

        let mut records = Vec::new();
        for entry in handle.tree.scan_prefix(index_prefix(field, value)) {
            let (key, _) = entry?;
            let id = decode_u64(&key[key.len() - 8..]);
            if let Some(record) = self.get(collection, id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Forces buffered writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }
}

/// Iteration handle over one collection, yielding records in storage
/// order.
pub struct RecordCursor {
    inner: sled::Iter,
}

impl Iterator for RecordCursor {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        Some(
            entry
                .map_err(StoreError::from)
                .and_then(|(_, bytes)| Ok(serde_json::from_slice(&bytes)?)),
        )
    }
}

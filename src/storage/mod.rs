pub mod kv;

pub use kv::{KvStore, RECORD_PREFIX, decode_u64, index_key, index_prefix, record_key};

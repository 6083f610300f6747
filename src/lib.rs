pub mod db;
pub mod error;
pub mod schema;
pub mod storage;
pub mod types;
pub mod ui;

pub use db::{Database, RecordCursor};
pub use error::{Result, StoreError};
pub use types::{Record, StoreConfig, StoreMode, Value};

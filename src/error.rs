use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("No index on field '{1}' of collection '{0}'")]
    IndexNotFound(String, String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<sled::transaction::TransactionError<StoreError>> for StoreError {
    fn from(e: sled::transaction::TransactionError<StoreError>) -> Self {
        match e {
            sled::transaction::TransactionError::Abort(e) => e,
            sled::transaction::TransactionError::Storage(e) => StoreError::Storage(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

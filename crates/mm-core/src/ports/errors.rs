use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(String),

    #[error("storage file is corrupt: {0}")]
    Corrupt(String),
}

use thiserror::Error;

/// Error type for state capture/restore.
///
/// Shape mismatches are configuration errors (the persisted entry was
/// produced by a differently-shaped tree or an older entry schema) and are
/// deliberately fatal: padding or truncating could re-hydrate a slot into
/// the wrong sub-state.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("state entry does not match the tree shape: {0}")]
    ShapeMismatch(String),

    #[error("state entry decode failed: {0}")]
    Decode(#[from] bincode::Error),

    #[error("state blob: {0}")]
    Blob(#[from] rondo_proto::DecodeError),
}

/// Error type for the data-retrieval collaborator.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("row not found")]
    RowNotFound,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

use thiserror::Error;

/// Errors surfaced by session store operations.
///
/// Decode failures are deliberately absent: a corrupt persisted document is
/// recovered as an empty collection (see `codec`), never propagated.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("student with album number {0} already exists")]
    DuplicateIdentity(String),

    #[error("storage error: {0}")]
    Persist(#[from] anyhow::Error),
}

impl StoreError {
    /// Stable error code for the IPC surface.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateIdentity(_) => "duplicate_identity",
            StoreError::Persist(_) => "storage_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed caller input, detected before any store access.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Signalled only by operations that contractually return exactly one
    /// result; everything else reports "nothing matched" as an empty
    /// collection or page.
    #[error("no matching row")]
    NotFound,

    /// A stored value could not be decoded into its domain representation.
    #[error("malformed stored value: {0}")]
    Corrupted(String),

    #[error("database pool error: {0}")]
    Pool(String),

    #[error("store error: {0}")]
    Store(diesel::result::Error),
}

impl CatalogError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CatalogError::InvalidArgument(message.into())
    }

    pub fn corrupted(message: impl Into<String>) -> Self {
        CatalogError::Corrupted(message.into())
    }
}

impl From<diesel::result::Error> for CatalogError {
    fn from(value: diesel::result::Error) -> Self {
        match value {
            diesel::result::Error::NotFound => CatalogError::NotFound,
            _ => CatalogError::Store(value),
        }
    }
}

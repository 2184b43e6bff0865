use crate::factory::ManagerKind;
use scopecache_core::CacheConfigError;
use thiserror::Error;

/// A scope that cannot identify a tenancy boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("{field} id has a nil uuid")]
    NilId { field: &'static str },

    #[error("{field} id has an empty type")]
    EmptyKind { field: &'static str },

    #[error("collection name cannot be empty")]
    EmptyCollectionName,
}

/// Error returned by the router accessors.
///
/// `E` is the error type of the factory behind the accessor. A construction
/// failure carries the factory's error unchanged as its `source`.
#[derive(Debug, Error)]
pub enum ManagerError<E> {
    #[error("invalid scope: {0}")]
    InvalidScope(#[from] ScopeError),

    #[error("failed to construct {kind} manager")]
    Construction {
        kind: ManagerKind,
        #[source]
        source: E,
    },
}

impl<E> ManagerError<E> {
    /// The factory error, if this was a construction failure.
    pub fn construction_source(&self) -> Option<&E> {
        match self {
            ManagerError::Construction { source, .. } => Some(source),
            ManagerError::InvalidScope(_) => None,
        }
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {cache} cache configuration: {source}")]
    InvalidCache {
        cache: ManagerKind,
        #[source]
        source: CacheConfigError,
    },

    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
}

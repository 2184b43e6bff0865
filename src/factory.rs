//! Factory seams for the three manager kinds.
//!
//! Factories are the only code the router runs on a cache miss. They may be
//! slow (connection setup, buffer allocation, warm-up) and are expected to be
//! semantically idempotent: building two managers for one scope is wasteful,
//! never incorrect.

use crate::scope::{CollectionScope, OrganizationScope};
use std::fmt;

/// The three manager kinds, one cache each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerKind {
    Collection,
    Index,
    Graph,
}

impl ManagerKind {
    pub const ALL: [ManagerKind; 3] = [
        ManagerKind::Collection,
        ManagerKind::Index,
        ManagerKind::Graph,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ManagerKind::Collection => "collection",
            ManagerKind::Index => "index",
            ManagerKind::Graph => "graph",
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds entity collection managers for a collection scope.
pub trait CollectionManagerFactory: Send + Sync {
    type Manager: Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_collection_manager(
        &self,
        scope: &CollectionScope,
    ) -> Result<Self::Manager, Self::Error>;
}

/// Builds entity index managers for an organization + collection pair.
pub trait IndexManagerFactory: Send + Sync {
    type Manager: Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_index_manager(
        &self,
        organization: &OrganizationScope,
        collection: &CollectionScope,
    ) -> Result<Self::Manager, Self::Error>;
}

/// Builds graph (edge) managers for an organization scope.
pub trait GraphManagerFactory: Send + Sync {
    type Manager: Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_graph_manager(&self, scope: &OrganizationScope)
        -> Result<Self::Manager, Self::Error>;
}

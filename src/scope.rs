//! Tenancy scopes used as cache keys.
//!
//! All scope types are immutable values: two scopes built from equal fields
//! are interchangeable as keys. [`CompositeIndexKey`] pairs an organization
//! with a collection for the index-manager cache.

use crate::error::ScopeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of an entity that anchors a scope (an organization, an
/// application, a user owning a collection).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id {
    uuid: Uuid,
    kind: String,
}

impl Id {
    pub fn new(uuid: Uuid, kind: impl Into<String>) -> Self {
        Self {
            uuid,
            kind: kind.into(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// An id is valid when its uuid is not nil and its kind is not blank.
    pub fn validate(&self, field: &'static str) -> Result<(), ScopeError> {
        if self.uuid.is_nil() {
            return Err(ScopeError::NilId { field });
        }
        if self.kind.trim().is_empty() {
            return Err(ScopeError::EmptyKind { field });
        }
        Ok(())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.uuid)
    }
}

/// Identifies a tenant organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationScope {
    organization: Id,
}

impl OrganizationScope {
    pub fn new(organization: Id) -> Self {
        Self { organization }
    }

    pub fn organization(&self) -> &Id {
        &self.organization
    }

    pub fn validate(&self) -> Result<(), ScopeError> {
        self.organization.validate("organization")
    }
}

impl fmt::Display for OrganizationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "org({})", self.organization)
    }
}

/// Identifies a single named collection owned by an entity inside an
/// organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionScope {
    organization: Id,
    owner: Id,
    name: String,
}

impl CollectionScope {
    pub fn new(organization: Id, owner: Id, name: impl Into<String>) -> Self {
        Self {
            organization,
            owner,
            name: name.into(),
        }
    }

    pub fn organization(&self) -> &Id {
        &self.organization
    }

    pub fn owner(&self) -> &Id {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The organization this collection lives in.
    pub fn organization_scope(&self) -> OrganizationScope {
        OrganizationScope::new(self.organization.clone())
    }

    pub fn validate(&self) -> Result<(), ScopeError> {
        self.organization.validate("organization")?;
        self.owner.validate("owner")?;
        if self.name.trim().is_empty() {
            return Err(ScopeError::EmptyCollectionName);
        }
        Ok(())
    }
}

impl fmt::Display for CollectionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "collection({}/{}/{})",
            self.organization, self.owner, self.name
        )
    }
}

/// Cache key for index managers: an organization paired with a collection.
///
/// Two keys are equal iff both components are equal. The derived `Hash`
/// feeds the organization first and the collection second, so the combined
/// hash depends on which scope plays which role.
///
/// # Examples
///
/// ```
/// use scopecache::{CollectionScope, CompositeIndexKey, Id, OrganizationScope};
/// use uuid::Uuid;
///
/// let org = OrganizationScope::new(Id::new(Uuid::new_v4(), "organization"));
/// let coll = CollectionScope::new(
///     org.organization().clone(),
///     Id::new(Uuid::new_v4(), "application"),
///     "users",
/// );
///
/// let a = CompositeIndexKey::new(org.clone(), coll.clone());
/// let b = CompositeIndexKey::new(org, coll);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeIndexKey {
    organization: OrganizationScope,
    collection: CollectionScope,
}

impl CompositeIndexKey {
    pub fn new(organization: OrganizationScope, collection: CollectionScope) -> Self {
        Self {
            organization,
            collection,
        }
    }

    pub fn organization(&self) -> &OrganizationScope {
        &self.organization
    }

    pub fn collection(&self) -> &CollectionScope {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn org(n: u128) -> OrganizationScope {
        OrganizationScope::new(Id::new(Uuid::from_u128(n), "organization"))
    }

    fn coll(org_n: u128, owner_n: u128, name: &str) -> CollectionScope {
        CollectionScope::new(
            Id::new(Uuid::from_u128(org_n), "organization"),
            Id::new(Uuid::from_u128(owner_n), "application"),
            name,
        )
    }

    #[test]
    fn test_scopes_compare_by_value() {
        assert_eq!(org(1), org(1));
        assert_ne!(org(1), org(2));
        assert_eq!(coll(1, 2, "users"), coll(1, 2, "users"));
        assert_ne!(coll(1, 2, "users"), coll(1, 2, "groups"));
        assert_eq!(hash_of(&coll(1, 2, "users")), hash_of(&coll(1, 2, "users")));
    }

    #[test]
    fn test_composite_key_differs_by_organization() {
        let a = CompositeIndexKey::new(org(1), coll(1, 5, "users"));
        let b = CompositeIndexKey::new(org(2), coll(1, 5, "users"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_composite_key_differs_by_collection() {
        let a = CompositeIndexKey::new(org(1), coll(1, 5, "users"));
        let b = CompositeIndexKey::new(org(1), coll(1, 5, "devices"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_validation() {
        assert!(org(1).validate().is_ok());
        assert!(coll(1, 2, "users").validate().is_ok());

        assert_eq!(
            org(0).validate(),
            Err(ScopeError::NilId {
                field: "organization"
            })
        );
        assert_eq!(
            OrganizationScope::new(Id::new(Uuid::from_u128(1), " ")).validate(),
            Err(ScopeError::EmptyKind {
                field: "organization"
            })
        );
        assert_eq!(
            coll(1, 0, "users").validate(),
            Err(ScopeError::NilId { field: "owner" })
        );
        assert_eq!(
            coll(1, 2, "").validate(),
            Err(ScopeError::EmptyCollectionName)
        );
    }

    #[test]
    fn test_collection_organization_scope() {
        assert_eq!(coll(7, 2, "users").organization_scope(), org(7));
    }

    proptest! {
        #[test]
        fn composite_equality_matches_components(
            org_a in 1u128..4,
            org_b in 1u128..4,
            owner_a in 1u128..4,
            owner_b in 1u128..4,
            name_a in "[a-c]{1,2}",
            name_b in "[a-c]{1,2}",
        ) {
            let key_a = CompositeIndexKey::new(org(org_a), coll(org_a, owner_a, &name_a));
            let key_b = CompositeIndexKey::new(org(org_b), coll(org_b, owner_b, &name_b));

            let components_equal = org_a == org_b && owner_a == owner_b && name_a == name_b;
            prop_assert_eq!(key_a == key_b, components_equal);
            if key_a == key_b {
                prop_assert_eq!(hash_of(&key_a), hash_of(&key_b));
            }
        }

        #[test]
        fn composite_key_is_reflexive_and_hash_stable(
            org_n in 1u128..u128::MAX,
            owner_n in 1u128..u128::MAX,
            name in "[a-z]{1,12}",
        ) {
            let key = CompositeIndexKey::new(org(org_n), coll(org_n, owner_n, &name));
            let copy = key.clone();
            prop_assert_eq!(&key, &copy);
            prop_assert_eq!(hash_of(&key), hash_of(&copy));
        }
    }
}

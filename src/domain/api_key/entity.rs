//! API Key aggregate
//!
//! An API key owns a set of role assignments, unique per role kind, and
//! turns them into the composite query spec describing what the key is
//! allowed to see. Validity (enabled + not expired) is a separate check the
//! authorization collaborator makes before any filter is built; the
//! filter-building operations never consult it.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::meta::ApiKeyMeta;
use super::role::{ApiKeyRole, Role, RoleDefinition, RoleMeta};
use crate::domain::clock::Clock;
use crate::domain::spec::Spec;

/// Opaque API key identifier, generated once and immutable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier (e.g. one loaded from storage)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// API key entity
///
/// Roles are kept in a `BTreeMap` keyed by role kind, which both enforces
/// at-most-one-assignment-per-kind and gives the stable conjunction order
/// that makes generated query snapshots reproducible. Callers must still
/// treat the role set as unordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    key: ApiKeyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_date: Option<DateTime<Utc>>,
    enabled: bool,
    roles: BTreeMap<Role, ApiKeyRole>,
}

impl ApiKey {
    fn with_parts(name: Option<String>, expiration_date: Option<DateTime<Utc>>) -> Self {
        Self {
            key: ApiKeyId::generate(),
            name,
            expiration_date,
            enabled: true,
            roles: BTreeMap::new(),
        }
    }

    /// Create a bare key: no roles, enabled, never expires
    ///
    /// A key without roles is an admin key and sees everything.
    pub fn create() -> Self {
        Self::with_parts(None, None)
    }

    /// Create a key from a creation payload, registering every role in it
    ///
    /// Duplicate role kinds in the payload collapse to the last metadata
    /// value, same as registering them one by one.
    pub fn from_meta(meta: ApiKeyMeta) -> Self {
        let mut api_key = Self::with_parts(meta.name, meta.expiration_date);
        for definition in meta.role_definitions {
            api_key.register_role(definition);
        }

        api_key
    }

    pub fn id(&self) -> &ApiKeyId {
        &self.key
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        self.expiration_date
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the expiration date has passed, per the given clock
    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        // One now() read per call; the comparison must not see two times.
        let now = clock.now();
        self.expiration_date.is_some_and(|expires| expires < now)
    }

    /// Whether this key is enabled and not expired
    ///
    /// The single authorization gate. Collaborators call this before
    /// trusting the key; none of the other operations re-check it.
    pub fn is_valid(&self, clock: &dyn Clock) -> bool {
        self.is_enabled() && !self.is_expired(clock)
    }

    /// Disable the key; one-way and idempotent
    pub fn disable(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    /// A key with no roles has unrestricted access
    pub fn is_admin(&self) -> bool {
        self.roles.is_empty()
    }

    /// Whether the key has an assignment for the given role kind
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains_key(&role)
    }

    /// Metadata for the given role kind, if assigned
    pub fn get_role_meta(&self, role: Role) -> Option<&RoleMeta> {
        self.roles.get(&role).map(ApiKeyRole::meta)
    }

    /// Apply `f` to every role assignment and collect the results
    pub fn map_roles<T>(&self, mut f: impl FnMut(Role, &RoleMeta) -> T) -> Vec<T> {
        self.roles
            .values()
            .map(|assignment| f(assignment.role(), assignment.meta()))
            .collect()
    }

    /// Register a role, or update its metadata if the kind is already assigned
    ///
    /// The sole mutation path for the role collection; there is no removal.
    pub fn register_role(&mut self, definition: RoleDefinition) {
        match self.roles.entry(definition.role()) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().replace_meta(definition.into_meta());
            }
            Entry::Vacant(slot) => {
                slot.insert(ApiKeyRole::new(self.key.clone(), definition));
            }
        }
    }

    /// The composite spec for what this key may see
    ///
    /// AND of every role's spec; no roles yields [`Spec::Always`], which is
    /// exactly the admin case without a branch.
    pub fn spec(&self, context: Option<&str>) -> Spec {
        Spec::and_all(
            self.roles
                .values()
                .map(|assignment| Role::to_spec(assignment, context)),
        )
    }

    /// Same conjunction in the inlined variant, for embedding in a larger query
    pub fn inlined_spec(&self) -> Spec {
        Spec::and_all(self.roles.values().map(Role::to_inlined_spec))
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::short_url::ShortUrlIdentifier;

    fn domain_role(authority: &str) -> RoleDefinition {
        RoleDefinition::domain_restricted(authority).unwrap()
    }

    fn short_url_role(code: &str) -> RoleDefinition {
        RoleDefinition::short_url_restricted(ShortUrlIdentifier::from_short_code(code))
    }

    #[test]
    fn test_created_key_is_admin_and_valid() {
        let key = ApiKey::create();
        let clock = FixedClock(Utc::now());

        assert!(key.is_admin());
        assert!(key.is_enabled());
        assert!(key.is_valid(&clock));
        assert!(key.expiration_date().is_none());
        assert!(key.name().is_none());
        assert!(key.spec(None).is_always());
        assert!(key.spec(Some("s")).is_always());
        assert!(key.inlined_spec().is_always());
    }

    #[test]
    fn test_created_keys_get_unique_ids() {
        let a = ApiKey::create();
        let b = ApiKey::create();

        assert_ne!(a.id(), b.id());
        assert_eq!(a.to_string(), a.id().as_str());
    }

    #[test]
    fn test_from_meta_registers_roles() {
        let meta = ApiKeyMeta::new()
            .with_name("svc")
            .with_role(domain_role("example.com"));
        let key = ApiKey::from_meta(meta);

        assert_eq!(key.name(), Some("svc"));
        assert!(!key.is_admin());
        assert!(key.has_role(Role::DomainRestricted));
        assert!(!key.has_role(Role::ShortUrlRestricted));
        assert_eq!(key.spec(None).to_string(), "domain.authority = 'example.com'");
    }

    #[test]
    fn test_from_meta_duplicate_kinds_last_wins() {
        let meta = ApiKeyMeta::new()
            .with_role(domain_role("first.com"))
            .with_role(domain_role("second.com"));
        let key = ApiKey::from_meta(meta);

        assert_eq!(key.map_roles(|role, _| role), vec![Role::DomainRestricted]);
        assert_eq!(
            key.get_role_meta(Role::DomainRestricted),
            Some(&RoleMeta::Domain {
                authority: "second.com".to_string()
            })
        );
    }

    #[test]
    fn test_expired_key_is_invalid_regardless_of_enabled() {
        let now = Utc::now();
        let meta = ApiKeyMeta::new().with_expiration_date(now - chrono::Duration::hours(1));
        let key = ApiKey::from_meta(meta);
        let clock = FixedClock(now);

        assert!(key.is_enabled());
        assert!(key.is_expired(&clock));
        assert!(!key.is_valid(&clock));
    }

    #[test]
    fn test_expiration_is_strictly_before_now() {
        let now = Utc::now();
        let meta = ApiKeyMeta::new().with_expiration_date(now);
        let key = ApiKey::from_meta(meta);

        // Expiring exactly now is not yet expired.
        assert!(!key.is_expired(&FixedClock(now)));
        assert!(key.is_expired(&FixedClock(now + chrono::Duration::seconds(1))));
    }

    #[test]
    fn test_disable_is_one_way_and_idempotent() {
        let mut key = ApiKey::create();
        let clock = FixedClock(Utc::now());

        key.disable();
        key.disable();

        assert!(!key.is_enabled());
        assert!(!key.is_valid(&clock));
        assert!(!key.is_expired(&clock));
    }

    #[test]
    fn test_register_role_updates_existing_assignment() {
        let mut key = ApiKey::create();

        key.register_role(domain_role("example.com"));
        key.register_role(domain_role("other.com"));

        assert_eq!(key.map_roles(|role, _| role).len(), 1);
        assert_eq!(
            key.get_role_meta(Role::DomainRestricted),
            Some(&RoleMeta::Domain {
                authority: "other.com".to_string()
            })
        );
    }

    #[test]
    fn test_get_role_meta_for_missing_role_is_none() {
        let key = ApiKey::create();

        assert_eq!(key.get_role_meta(Role::DomainRestricted), None);
    }

    #[test]
    fn test_register_role_round_trip() {
        let mut key = ApiKey::create();
        let definition = domain_role("example.com");

        key.register_role(definition.clone());

        assert!(key.has_role(definition.role()));
        assert_eq!(key.get_role_meta(definition.role()), Some(definition.meta()));
    }

    #[test]
    fn test_spec_is_conjunction_of_role_specs() {
        let mut key = ApiKey::create();
        key.register_role(domain_role("example.com"));
        key.register_role(short_url_role("abc123"));

        let spec = key.spec(None);
        assert_eq!(
            spec.to_string(),
            "domain.authority = 'example.com' AND \
             (short_code = 'abc123' AND domain.authority IS NULL)"
        );
    }

    #[test]
    fn test_spec_is_independent_of_registration_order() {
        let mut forward = ApiKey::create();
        forward.register_role(domain_role("example.com"));
        forward.register_role(short_url_role("abc123"));

        let mut reverse = ApiKey::create();
        reverse.register_role(short_url_role("abc123"));
        reverse.register_role(domain_role("example.com"));

        assert_eq!(forward.spec(None), reverse.spec(None));
        assert_eq!(forward.spec(Some("s")), reverse.spec(Some("s")));
        assert_eq!(forward.inlined_spec(), reverse.inlined_spec());
    }

    #[test]
    fn test_inlined_spec_uses_joined_columns() {
        let mut key = ApiKey::create();
        key.register_role(domain_role("example.com"));

        assert_eq!(
            key.inlined_spec().to_string(),
            "short_urls.domain_authority = 'example.com'"
        );
    }

    #[test]
    fn test_map_roles_sees_every_assignment() {
        let mut key = ApiKey::create();
        key.register_role(domain_role("example.com"));
        key.register_role(short_url_role("abc123"));

        let mut kinds = key.map_roles(|role, _| role);
        kinds.sort();
        assert_eq!(kinds, vec![Role::DomainRestricted, Role::ShortUrlRestricted]);
    }

    #[test]
    fn test_role_assignments_back_reference_owning_key() {
        let key = ApiKey::create();
        let assignment = ApiKeyRole::new(key.id().clone(), domain_role("example.com"));

        assert_eq!(assignment.api_key(), key.id());
    }

    #[test]
    fn test_spec_does_not_consult_validity() {
        let now = Utc::now();
        let meta = ApiKeyMeta::new()
            .with_expiration_date(now - chrono::Duration::days(1))
            .with_role(domain_role("example.com"));
        let mut key = ApiKey::from_meta(meta);
        key.disable();

        // Expired and disabled, but the filter is still built; rejecting
        // the key is is_valid()'s caller's job.
        assert_eq!(key.spec(None).to_string(), "domain.authority = 'example.com'");
    }

    #[test]
    fn test_serialization_round_trip() {
        let meta = ApiKeyMeta::new()
            .with_name("svc")
            .with_role(domain_role("example.com"));
        let key = ApiKey::from_meta(meta);

        let json = serde_json::to_string(&key).unwrap();
        let back: ApiKey = serde_json::from_str(&json).unwrap();

        assert_eq!(back, key);
        assert!(back.has_role(Role::DomainRestricted));
    }
}

//! The role table.
//!
//! [`RolePolicy`] maps each role to a set of permission tokens and a set of
//! route prefixes. It is built once at startup, either from the built-in
//! table or from a JSON file, and never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use stockpoint_core::permissions;
use stockpoint_models::Role;

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Failed to read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed policy: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown role in policy: {0}")]
    UnknownRole(String),

    #[error("Invalid route prefix for {role}: {prefix:?} must start with '/'")]
    InvalidRoute { role: String, prefix: String },

    #[error("Empty permission token for {0}")]
    EmptyPermission(String),
}

#[derive(Debug, Deserialize)]
struct RoleEntry {
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    routes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePolicy {
    permissions: HashMap<Role, BTreeSet<String>>,
    routes: HashMap<Role, BTreeSet<String>>,
}

const CRUD: [&str; 4] = [
    permissions::CREATE,
    permissions::READ,
    permissions::UPDATE,
    permissions::DELETE,
];
const CRU: [&str; 3] = [permissions::CREATE, permissions::READ, permissions::UPDATE];

impl RolePolicy {
    /// The built-in table.
    pub fn canonical() -> Self {
        RolePolicy::default()
            .with_role(
                Role::Developer,
                &permissions::ALL,
                &[
                    "/home",
                    "/companies",
                    "/warehouse",
                    "/store",
                    "/users",
                    "/skater",
                    "/customer",
                    "/settings",
                    "/developer",
                ],
            )
            .with_role(
                Role::GeneralManager,
                &CRUD,
                &["/home", "/warehouse", "/store", "/users", "/settings"],
            )
            .with_role(Role::WarehouseManager, &CRUD, &["/home", "/warehouse"])
            .with_role(Role::WarehouseSalesperson, &CRU, &["/home", "/warehouse"])
            .with_role(Role::PosSalesperson, &CRU, &["/home", "/store"])
            .with_role(Role::Skater, &[permissions::SKA], &["/home", "/skater"])
            .with_role(
                Role::Customer,
                &[permissions::CUSTOMER],
                &["/home", "/customer"],
            )
    }

    /// Replaces the entry for `role`.
    pub fn with_role(mut self, role: Role, permissions: &[&str], routes: &[&str]) -> Self {
        self.permissions
            .insert(role, permissions.iter().map(|p| p.to_string()).collect());
        self.routes
            .insert(role, routes.iter().map(|r| r.to_string()).collect());
        self
    }

    /// Parses a policy document of the form
    /// `{ "<role>": { "permissions": [...], "routes": [...] } }`.
    ///
    /// Roles missing from the document get no permissions and no routes.
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let entries: BTreeMap<String, RoleEntry> = serde_json::from_str(json)?;
        let mut policy = RolePolicy::default();

        for (name, entry) in entries {
            let role: Role = name
                .parse()
                .map_err(|_| PolicyError::UnknownRole(name.clone()))?;

            if entry.permissions.iter().any(|p| p.trim().is_empty()) {
                return Err(PolicyError::EmptyPermission(name));
            }
            if let Some(prefix) = entry.routes.iter().find(|r| !r.starts_with('/')) {
                return Err(PolicyError::InvalidRoute {
                    role: name,
                    prefix: prefix.clone(),
                });
            }

            policy
                .permissions
                .insert(role, entry.permissions.into_iter().collect());
            policy.routes.insert(role, entry.routes.into_iter().collect());
        }

        Ok(policy)
    }

    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The policy file at `path` when one is configured, the built-in table
    /// otherwise. Shared by the server and the admin CLI so both enforce the
    /// same table.
    pub fn from_path_or_canonical(path: Option<&Path>) -> Result<Self, PolicyError> {
        match path {
            Some(path) => {
                let policy = Self::load(path)?;
                tracing::info!(path = %path.display(), "Loaded role policy");
                Ok(policy)
            }
            None => Ok(Self::canonical()),
        }
    }

    /// Whether `role` holds `action`. Unknown roles hold nothing.
    pub fn has_permission(&self, role: &str, action: &str) -> bool {
        self.permission_set(role)
            .is_some_and(|set| set.contains(action))
    }

    /// Whether `role` may navigate to `path`. Unknown roles may go nowhere.
    pub fn can_access_route(&self, role: &str, path: &str) -> bool {
        self.route_set(role)
            .is_some_and(|set| set.iter().any(|prefix| prefix_matches(prefix, path)))
    }

    /// Sorted permission set of `role`, empty if unknown.
    pub fn permissions_for(&self, role: &str) -> BTreeSet<String> {
        self.permission_set(role).cloned().unwrap_or_default()
    }

    /// Sorted route prefixes of `role`, empty if unknown.
    pub fn routes_for(&self, role: &str) -> BTreeSet<String> {
        self.route_set(role).cloned().unwrap_or_default()
    }

    /// Whether any role's prefix covers `path`. Paths no role can reach are
    /// not page routes and are left alone by the route gate.
    pub fn covers(&self, path: &str) -> bool {
        self.routes
            .values()
            .flatten()
            .any(|prefix| prefix_matches(prefix, path))
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|role| {
            self.permissions.contains_key(role) || self.routes.contains_key(role)
        })
    }

    fn permission_set(&self, role: &str) -> Option<&BTreeSet<String>> {
        role.parse::<Role>()
            .ok()
            .and_then(|role| self.permissions.get(&role))
    }

    fn route_set(&self, role: &str) -> Option<&BTreeSet<String>> {
        role.parse::<Role>()
            .ok()
            .and_then(|role| self.routes.get(&role))
    }
}

/// Prefix match on a path-segment boundary: `/home` matches `/home` and
/// `/home/profile` but not `/homex`.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [&str; 7] = [
        "developer",
        "general_manager",
        "warehouse_manager",
        "warehouse_salesperson",
        "pos_salesperson",
        "skater",
        "customer",
    ];

    #[test]
    fn test_unknown_role_has_nothing() {
        let policy = RolePolicy::canonical();
        for action in permissions::ALL {
            assert!(!policy.has_permission("intern", action));
            assert!(!policy.has_permission("", action));
        }
        for path in ["/", "/home", "/warehouse/boxes", "/developer"] {
            assert!(!policy.can_access_route("intern", path));
        }
        assert!(policy.permissions_for("intern").is_empty());
        assert!(policy.routes_for("intern").is_empty());
    }

    #[test]
    fn test_listed_pairs_hold_and_unlisted_do_not() {
        let policy = RolePolicy::canonical();
        let table: [(&str, &[&str]); 7] = [
            ("developer", &permissions::ALL),
            ("general_manager", &CRUD),
            ("warehouse_manager", &CRUD),
            ("warehouse_salesperson", &CRU),
            ("pos_salesperson", &CRU),
            ("skater", &[permissions::SKA]),
            ("customer", &[permissions::CUSTOMER]),
        ];

        for (role, granted) in table {
            for action in permissions::ALL {
                assert_eq!(
                    policy.has_permission(role, action),
                    granted.contains(&action),
                    "{role} / {action}"
                );
            }
        }
    }

    #[test]
    fn test_customer_cannot_read() {
        let policy = RolePolicy::canonical();
        assert!(!policy.has_permission("customer", "read"));
        assert!(policy.has_permission("customer", "customer"));
    }

    #[test]
    fn test_route_prefix_respects_segments() {
        let policy = RolePolicy::canonical();
        assert!(policy.can_access_route("customer", "/home"));
        assert!(policy.can_access_route("customer", "/home/profile"));
        assert!(!policy.can_access_route("customer", "/homex"));
        assert!(!policy.can_access_route("customer", "/warehouse"));
    }

    #[test]
    fn test_trailing_slash_prefix() {
        let policy = RolePolicy::default().with_role(Role::Skater, &[], &["/skater/"]);
        assert!(policy.can_access_route("skater", "/skater/route-7"));
        assert!(!policy.can_access_route("skater", "/skaterx"));
    }

    #[test]
    fn test_every_role_reaches_home() {
        let policy = RolePolicy::canonical();
        for role in ROLES {
            assert!(policy.can_access_route(role, "/home"), "{role}");
        }
    }

    #[test]
    fn test_only_developer_reaches_developer_area() {
        let policy = RolePolicy::canonical();
        for role in ROLES {
            assert_eq!(
                policy.can_access_route(role, "/developer/tools"),
                role == "developer"
            );
        }
    }

    #[test]
    fn test_covers() {
        let policy = RolePolicy::canonical();
        assert!(policy.covers("/warehouse/boxes/12"));
        assert!(policy.covers("/skater"));
        assert!(!policy.covers("/api/auth/authorize"));
        assert!(!policy.covers("/login"));
        assert!(!policy.covers("/health"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "skater": { "permissions": ["ska"], "routes": ["/home", "/skater"] },
            "customer": { "permissions": ["customer", "read"], "routes": ["/customer"] }
        }"#;
        let policy = RolePolicy::from_json(json).unwrap();

        assert!(policy.has_permission("customer", "read"));
        assert!(!policy.can_access_route("customer", "/home"));
        assert!(!policy.has_permission("developer", "read"));
        assert_eq!(
            policy.roles().collect::<Vec<_>>(),
            vec![Role::Skater, Role::Customer]
        );
    }

    #[test]
    fn test_from_json_rejects_unknown_role() {
        let err = RolePolicy::from_json(r#"{ "intern": { "permissions": ["read"] } }"#)
            .unwrap_err();
        assert!(matches!(err, PolicyError::UnknownRole(name) if name == "intern"));
    }

    #[test]
    fn test_from_json_rejects_relative_route() {
        let err = RolePolicy::from_json(r#"{ "skater": { "routes": ["skater"] } }"#).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidRoute { .. }));
    }

    #[test]
    fn test_from_json_rejects_empty_permission() {
        let err =
            RolePolicy::from_json(r#"{ "skater": { "permissions": [" "] } }"#).unwrap_err();
        assert!(matches!(err, PolicyError::EmptyPermission(_)));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            RolePolicy::from_json("[1, 2]"),
            Err(PolicyError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path_or_canonical_without_path() {
        let policy = RolePolicy::from_path_or_canonical(None).unwrap();
        assert_eq!(policy, RolePolicy::canonical());
    }

    #[test]
    fn test_from_path_or_canonical_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "stockpoint-policy-{}.json",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(
            &path,
            r#"{ "skater": { "permissions": ["ska"], "routes": ["/skater"] } }"#,
        )
        .unwrap();

        let policy = RolePolicy::from_path_or_canonical(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(policy.has_permission("skater", "ska"));
        assert!(!policy.can_access_route("skater", "/home"));
        assert!(!policy.has_permission("developer", "read"));
    }

    #[test]
    fn test_from_path_or_canonical_names_missing_file() {
        let err = RolePolicy::from_path_or_canonical(Some(Path::new("/nonexistent/policy.json")))
            .unwrap_err();
        assert!(matches!(err, PolicyError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/policy.json"));
    }
}

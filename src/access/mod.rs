//! Role-based permission checks
//!
//! [`has_permission`] is a pure predicate: same user, resource and action
//! always give the same answer, and nothing is read from shared state.
//! Callers decide what to show or refuse based on it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AsrError, ConfigError};

/// Roles known to the back office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Accountant,
    Reviewer,
    Viewer,
}

/// Things a permission can be granted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Documents,
    Vendors,
    Exports,
    Settings,
}

/// Operations on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Write,
    Export,
    Delete,
}

/// The acting user, as far as permission checks care
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub role: Role,
    pub active: bool,
}

impl User {
    pub fn new(role: Role) -> Self {
        Self { role, active: true }
    }

    pub fn inactive(role: Role) -> Self {
        Self { role, active: false }
    }
}

/// Whether `user` may perform `action` on `resource`
pub fn has_permission(user: &User, resource: Resource, action: Action) -> bool {
    use Action::*;
    use Resource::*;

    if !user.active {
        return false;
    }

    match user.role {
        Role::Admin => true,
        Role::Accountant => match resource {
            Documents | Vendors => matches!(action, Read | Write | Export),
            Exports => matches!(action, Read | Export),
            Settings => action == Read,
        },
        Role::Reviewer => match resource {
            Documents => matches!(action, Read | Write),
            Vendors => action == Read,
            Exports | Settings => false,
        },
        Role::Viewer => matches!(resource, Documents | Vendors) && action == Read,
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Accountant => "accountant",
            Role::Reviewer => "reviewer",
            Role::Viewer => "viewer",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = AsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "accountant" => Ok(Role::Accountant),
            "reviewer" => Ok(Role::Reviewer),
            "viewer" => Ok(Role::Viewer),
            _ => Err(ConfigError::InvalidValue {
                field: "access.role".to_string(),
                value: s.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Export => "export",
            Action::Delete => "delete",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Documents => "documents",
            Resource::Vendors => "vendors",
            Resource::Exports => "exports",
            Resource::Settings => "settings",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCES: [Resource; 4] = [
        Resource::Documents,
        Resource::Vendors,
        Resource::Exports,
        Resource::Settings,
    ];
    const ACTIONS: [Action; 4] = [Action::Read, Action::Write, Action::Export, Action::Delete];

    #[test]
    fn test_admin_can_do_everything() {
        let admin = User::new(Role::Admin);
        for resource in RESOURCES {
            for action in ACTIONS {
                assert!(has_permission(&admin, resource, action));
            }
        }
    }

    #[test]
    fn test_inactive_user_denied() {
        let user = User::inactive(Role::Admin);
        for resource in RESOURCES {
            for action in ACTIONS {
                assert!(!has_permission(&user, resource, action));
            }
        }
    }

    #[test]
    fn test_accountant() {
        let user = User::new(Role::Accountant);
        assert!(has_permission(&user, Resource::Exports, Action::Export));
        assert!(has_permission(&user, Resource::Documents, Action::Write));
        assert!(has_permission(&user, Resource::Settings, Action::Read));
        assert!(!has_permission(&user, Resource::Settings, Action::Write));
        assert!(!has_permission(&user, Resource::Documents, Action::Delete));
    }

    #[test]
    fn test_reviewer_and_viewer_cannot_export() {
        for role in [Role::Reviewer, Role::Viewer] {
            let user = User::new(role);
            assert!(!has_permission(&user, Resource::Exports, Action::Export));
            assert!(has_permission(&user, Resource::Documents, Action::Read));
        }
        assert!(has_permission(
            &User::new(Role::Reviewer),
            Resource::Documents,
            Action::Write,
        ));
        assert!(!has_permission(
            &User::new(Role::Viewer),
            Resource::Documents,
            Action::Write,
        ));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Accountant".parse::<Role>().unwrap(), Role::Accountant);
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::Viewer.to_string(), "viewer");
    }
}

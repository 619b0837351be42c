use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Permission represents a bitmask of actions a role may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(u32);

impl Permission {
    pub const CREATE: Permission = Permission(1 << 0); // 1
    pub const EDIT: Permission = Permission(1 << 1); // 2
    pub const DELETE: Permission = Permission(1 << 2); // 4
    pub const VIEW: Permission = Permission(1 << 3); // 8
    pub const EXPORT: Permission = Permission(1 << 4); // 16
    pub const MANAGE_USERS: Permission = Permission(1 << 5); // 32

    const ALL: [(Permission, &'static str); 6] = [
        (Self::CREATE, "create"),
        (Self::EDIT, "edit"),
        (Self::DELETE, "delete"),
        (Self::VIEW, "view"),
        (Self::EXPORT, "export"),
        (Self::MANAGE_USERS, "manage_users"),
    ];

    /// Returns true if this permission bitmask contains the required permission.
    #[must_use]
    pub const fn has(self, required: Permission) -> bool {
        self.0 & required.0 == required.0
    }

    /// Combines two permission bitmasks.
    #[must_use]
    pub const fn union(self, other: Permission) -> Permission {
        Permission(self.0 | other.0)
    }

    /// Converts an action name to its bitmask value.
    pub fn parse(action: &str) -> Option<Permission> {
        Self::ALL
            .iter()
            .find(|(_, name)| *name == action)
            .map(|(p, _)| *p)
    }

    /// Returns the action names contained in this bitmask.
    #[must_use]
    pub fn to_strings(self) -> Vec<&'static str> {
        Self::ALL
            .iter()
            .filter(|(p, _)| self.has(*p))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_strings().join(", "))
    }
}

/// The three user roles. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Recruiter,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Recruiter, Role::Viewer];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Recruiter => "recruiter",
            Role::Viewer => "viewer",
        }
    }

    /// Static role table.
    #[must_use]
    pub const fn permissions(self) -> Permission {
        match self {
            Role::Admin => Permission(
                Permission::CREATE.0
                    | Permission::EDIT.0
                    | Permission::DELETE.0
                    | Permission::VIEW.0
                    | Permission::EXPORT.0
                    | Permission::MANAGE_USERS.0,
            ),
            Role::Recruiter => Permission(
                Permission::CREATE.0
                    | Permission::EDIT.0
                    | Permission::DELETE.0
                    | Permission::VIEW.0
                    | Permission::EXPORT.0,
            ),
            Role::Viewer => Permission(Permission::VIEW.0 | Permission::EXPORT.0),
        }
    }

    #[must_use]
    pub const fn can(self, action: Permission) -> bool {
        self.permissions().has(action)
    }

    /// Roles that can own candidates.
    #[must_use]
    pub const fn is_recruiter(self) -> bool {
        matches!(self, Role::Admin | Role::Recruiter)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::InvalidRole(s.to_string()))
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

/// Answers whether `role` may perform `action`. Unknown roles and unknown
/// actions are never granted anything.
#[must_use]
pub fn check_permission(role: &str, action: &str) -> bool {
    match (role.parse::<Role>(), Permission::parse(action)) {
        (Ok(role), Some(action)) => role.can(action),
        _ => false,
    }
}

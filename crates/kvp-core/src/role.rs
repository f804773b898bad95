//! Session roles and the capability checks every mutating operation consults.
//!
//! The role is always passed in by the caller. Nothing in the core reads an
//! ambient "current user".

use crate::error::{KvpError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Admin,
    Editor,
    Reader,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Editor, Role::Reader]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Reader => "reader",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = KvpError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "editor" | "bearbeiter" => Ok(Role::Editor),
            "reader" | "leser" => Ok(Role::Reader),
            other => Err(KvpError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

/// Admin and Editor may change phase data, task status and project fields.
pub fn can_edit(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Editor)
}

/// Only Admin may delete tasks or projects.
pub fn can_delete(role: Role) -> bool {
    matches!(role, Role::Admin)
}

pub fn ensure_can_edit(role: Role) -> Result<()> {
    if can_edit(role) {
        Ok(())
    } else {
        Err(KvpError::InvalidOperation(format!(
            "role '{role}' is read-only"
        )))
    }
}

pub fn ensure_can_delete(role: Role) -> Result<()> {
    if can_delete(role) {
        Ok(())
    } else {
        Err(KvpError::InvalidOperation(format!(
            "role '{role}' may not delete"
        )))
    }
}

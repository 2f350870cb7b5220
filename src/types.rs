//! Wire DTOs exchanged with the skul backend.
//!
//! DESIGN
//! ======
//! Field names follow the backend's JSON (camelCase). Role is never stored;
//! it is read off the id prefix the backend assigns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Id prefix the backend assigns to admin accounts.
pub const ADMIN_ID_PREFIX: &str = "adm";
/// Id prefix the backend assigns to student accounts.
pub const STUDENT_ID_PREFIX: &str = "stu";

/// Identity of the authenticated principal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl UserInfo {
    /// Role implied by the id prefix, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        Role::from_id(&self.id)
    }
}

/// Kind of principal, derived from [`UserInfo::id`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        if id.starts_with(ADMIN_ID_PREFIX) {
            Some(Self::Admin)
        } else if id.starts_with(STUDENT_ID_PREFIX) {
            Some(Self::Student)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A test owned by an admin. Read-only on the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Examination {
    pub id: String,
    #[serde(rename = "adminID")]
    pub admin_id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub question_count: i64,
    /// Owning admin; the backend omits it when the relation is not loaded.
    #[serde(default)]
    pub admin: Option<UserInfo>,
}

/// Login request body shared by admins and students.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Partial profile update. Absent fields are left untouched by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Backend error envelope, for callers inspecting [`crate::ClientError::body`].
/// Every field is optional on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    /// Per-field validation messages.
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
    #[serde(default)]
    pub code: Option<u16>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

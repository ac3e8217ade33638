use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::text_enum;
use crate::database::document::Document;
use crate::filter::FieldValue;

text_enum! {
    Role {
        Admin => "admin",
        Superadmin => "superadmin",
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    /// Stored lowercased.
    pub email: String,
    /// PHC-format argon2 hash.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password: password_hash,
            role,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Superadmin)
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Document for User {
    const TABLE: &'static str = "users";
    const UNIQUE: &'static [&'static str] = &["email"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("name", self.name.clone().into()),
            ("email", self.email.clone().into()),
            ("password", self.password.clone().into()),
            ("role", self.role.into()),
            ("is_active", self.is_active.into()),
            ("last_login", self.last_login.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_active_with_lowercase_email() {
        let user = User::new(" Ada ", " Ada@Javelin.COM ", "hash".to_string(), Role::Admin);
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@javelin.com");
        assert!(user.is_active);
        assert!(user.is_admin());
        assert!(!user.is_superadmin());
    }

    #[test]
    fn password_is_never_serialized() {
        let user = User::new("Ada", "ada@javelin.com", "secret-hash".to_string(), Role::Superadmin);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "superadmin");
        assert!(json.get("_id").is_some());
        assert_eq!(json["isActive"], true);
    }
}

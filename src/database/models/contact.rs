use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::text_enum;
use crate::database::document::Document;
use crate::filter::FieldValue;

text_enum! {
    ContactStatus {
        New => "new",
        Read => "read",
        Replied => "replied",
        Archived => "archived",
    }
}

impl Default for ContactStatus {
    fn default() -> Self {
        ContactStatus::New
    }
}

/// A message submitted through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub notes: Option<String>,
    pub replied_at: Option<DateTime<Utc>>,
    pub replied_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(name: &str, email: &str, phone: Option<String>, subject: &str, message: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            phone: phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            subject: subject.trim().to_string(),
            message: message.to_string(),
            status: ContactStatus::New,
            notes: None,
            replied_at: None,
            replied_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an admin status change. Moving to `replied` records who replied
    /// and when.
    pub fn set_status(&mut self, status: ContactStatus, by: Uuid, now: DateTime<Utc>) {
        if status == ContactStatus::Replied && self.status != ContactStatus::Replied {
            self.replied_at = Some(now);
            self.replied_by = Some(by);
        }
        self.status = status;
    }
}

impl Document for Contact {
    const TABLE: &'static str = "contacts";

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("name", self.name.clone().into()),
            ("email", self.email.clone().into()),
            ("phone", self.phone.clone().into()),
            ("subject", self.subject.clone().into()),
            ("message", self.message.clone().into()),
            ("status", self.status.into()),
            ("notes", self.notes.clone().into()),
            ("replied_at", self.replied_at.into()),
            ("replied_by", self.replied_by.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

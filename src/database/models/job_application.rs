use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::document::Document;
use crate::filter::FieldValue;

/// A recruitment application with links to the uploaded documents.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub state: String,
    pub age: i32,
    pub position: String,
    pub experience: Option<String>,
    pub message: Option<String>,
    pub passport: Option<String>,
    pub cv: Option<String>,
    pub id_card: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for JobApplication {
    const TABLE: &'static str = "job_applications";

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("full_name", self.full_name.clone().into()),
            ("email", self.email.clone().into()),
            ("phone", self.phone.clone().into()),
            ("state", self.state.clone().into()),
            ("age", self.age.into()),
            ("position", self.position.clone().into()),
            ("experience", self.experience.clone().into()),
            ("message", self.message.clone().into()),
            ("passport", self.passport.clone().into()),
            ("cv", self.cv.clone().into()),
            ("id_card", self.id_card.clone().into()),
            ("submitted_at", self.submitted_at.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

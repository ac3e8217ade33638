use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::document::{json_field, Document};
use crate::filter::FieldValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSocialLinks {
    pub linkedin: String,
    pub twitter: String,
    pub facebook: String,
    pub instagram: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub bio: String,
    pub image: String,
    pub image_public_id: Option<String>,
    pub social_links: Json<TeamSocialLinks>,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn new(name: &str, position: &str, bio: &str, image: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            position: position.trim().to_string(),
            bio: bio.trim().to_string(),
            image,
            image_public_id: None,
            social_links: Json(TeamSocialLinks::default()),
            display_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for TeamMember {
    const TABLE: &'static str = "team_members";

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("name", self.name.clone().into()),
            ("position", self.position.clone().into()),
            ("bio", self.bio.clone().into()),
            ("image", self.image.clone().into()),
            ("image_public_id", self.image_public_id.clone().into()),
            ("social_links", json_field(&self.social_links.0)),
            ("display_order", self.display_order.into()),
            ("is_active", self.is_active.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

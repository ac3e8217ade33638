use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::Coordinates;
use crate::database::document::{json_field, Document};
use crate::filter::FieldValue;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub description: String,
    pub image: String,
    pub image_public_id: Option<String>,
    pub services: Vec<String>,
    pub coordinates: Json<Coordinates>,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    pub fn new(name: &str, location: &str, description: &str, image: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            location: location.trim().to_string(),
            description: description.trim().to_string(),
            image,
            image_public_id: None,
            services: Vec::new(),
            coordinates: Json(Coordinates::default()),
            display_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Site {
    const TABLE: &'static str = "sites";

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("name", self.name.clone().into()),
            ("location", self.location.clone().into()),
            ("description", self.description.clone().into()),
            ("image", self.image.clone().into()),
            ("image_public_id", self.image_public_id.clone().into()),
            ("services", self.services.clone().into()),
            ("coordinates", json_field(&self.coordinates.0)),
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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{text_enum, CategoryOption};
use crate::database::document::Document;
use crate::filter::FieldValue;

text_enum! {
    GalleryCategory {
        WorkInAction => "work-in-action",
        Events => "events",
        Team => "team",
        Facilities => "facilities",
        Other => "other",
    }
}

impl Default for GalleryCategory {
    fn default() -> Self {
        GalleryCategory::WorkInAction
    }
}

impl GalleryCategory {
    pub fn label(&self) -> &'static str {
        match self {
            GalleryCategory::WorkInAction => "Work in Action",
            GalleryCategory::Events => "Events",
            GalleryCategory::Team => "Team",
            GalleryCategory::Facilities => "Facilities",
            GalleryCategory::Other => "Other",
        }
    }

    pub fn options() -> Vec<CategoryOption> {
        Self::ALL
            .iter()
            .map(|c| CategoryOption { value: c.as_str(), label: c.label() })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: GalleryCategory,
    pub image: String,
    pub image_public_id: Option<String>,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GalleryItem {
    pub fn new(title: &str, category: GalleryCategory, image: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            description: String::new(),
            category,
            image,
            image_public_id: None,
            display_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for GalleryItem {
    const TABLE: &'static str = "gallery_items";

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("title", self.title.clone().into()),
            ("description", self.description.clone().into()),
            ("category", self.category.into()),
            ("image", self.image.clone().into()),
            ("image_public_id", self.image_public_id.clone().into()),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_round_trip_through_text() {
        assert_eq!("work-in-action".parse::<GalleryCategory>(), Ok(GalleryCategory::WorkInAction));
        assert!("portraits".parse::<GalleryCategory>().is_err());
        let labels: Vec<_> = GalleryCategory::options().iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["Work in Action", "Events", "Team", "Facilities", "Other"]);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{text_enum, CategoryOption};
use crate::database::document::Document;
use crate::filter::FieldValue;

text_enum! {
    NewsCategory {
        News => "news",
        Blog => "blog",
        Announcement => "announcement",
        PressRelease => "press-release",
    }
}

impl Default for NewsCategory {
    fn default() -> Self {
        NewsCategory::News
    }
}

impl NewsCategory {
    pub fn label(&self) -> &'static str {
        match self {
            NewsCategory::News => "News",
            NewsCategory::Blog => "Blog",
            NewsCategory::Announcement => "Announcement",
            NewsCategory::PressRelease => "Press Release",
        }
    }

    pub fn options() -> Vec<CategoryOption> {
        Self::ALL
            .iter()
            .map(|c| CategoryOption { value: c.as_str(), label: c.label() })
            .collect()
    }
}

text_enum! {
    PostStatus {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

impl Default for PostStatus {
    fn default() -> Self {
        PostStatus::Draft
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NewsPost {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: String,
    pub image_public_id: Option<String>,
    pub category: NewsCategory,
    pub tags: Vec<String>,
    #[serde(skip_serializing, default)]
    pub author_id: Option<Uuid>,
    pub status: PostStatus,
    pub views: i64,
    pub is_active: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsPost {
    pub fn new(title: &str, excerpt: &str, content: &str, featured_image: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            slug: slugify(title),
            excerpt: excerpt.trim().to_string(),
            content: content.to_string(),
            featured_image,
            image_public_id: None,
            category: NewsCategory::default(),
            tags: Vec::new(),
            author_id: None,
            status: PostStatus::default(),
            views: 0,
            is_active: true,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the post to `status`, stamping `published_at` the first time it
    /// becomes published.
    pub fn set_status(&mut self, status: PostStatus, now: DateTime<Utc>) {
        if status == PostStatus::Published && self.status != PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.status = status;
    }
}

/// Lowercases and collapses every run of non-alphanumerics into one `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRef {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
}

/// A post with its author's name resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPostView {
    #[serde(flatten)]
    pub post: NewsPost,
    pub author: Option<AuthorRef>,
}

impl Document for NewsPost {
    const TABLE: &'static str = "news_posts";
    const UNIQUE: &'static [&'static str] = &["slug"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("title", self.title.clone().into()),
            ("slug", self.slug.clone().into()),
            ("excerpt", self.excerpt.clone().into()),
            ("content", self.content.clone().into()),
            ("featured_image", self.featured_image.clone().into()),
            ("image_public_id", self.image_public_id.clone().into()),
            ("category", self.category.into()),
            ("tags", self.tags.clone().into()),
            ("author_id", self.author_id.into()),
            ("status", self.status.into()),
            ("views", self.views.into()),
            ("is_active", self.is_active.into()),
            ("published_at", self.published_at.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

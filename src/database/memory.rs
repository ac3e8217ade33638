use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::document::Document;
use crate::database::manager::DatabaseError;
use crate::database::repository::Repository;
use crate::filter::{FieldValue, Filter};

/// Process-local table. Used with `DATABASE_URL=memory://` and by the
/// integration tests.
pub struct MemoryRepository<T> {
    rows: RwLock<Vec<T>>,
}

impl<T: Document> MemoryRepository<T> {
    pub fn new() -> Self {
        Self { rows: RwLock::new(Vec::new()) }
    }

    fn check_unique(rows: &[T], doc: &T) -> Result<(), DatabaseError> {
        let fields = doc.to_fields();
        for column in T::UNIQUE {
            let Some(value) = field(&fields, column) else { continue };
            let clash = rows
                .iter()
                .filter(|other| other.id() != doc.id())
                .any(|other| field(&other.to_fields(), column).as_ref() == Some(&value));
            if clash {
                return Err(DatabaseError::Conflict(format!("{}_{}_key", T::TABLE, column)));
            }
        }
        Ok(())
    }
}

impl<T: Document> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn field(fields: &[(&'static str, FieldValue)], column: &str) -> Option<FieldValue> {
    fields.iter().find(|(name, _)| *name == column).map(|(_, v)| v.clone())
}

#[async_trait]
impl<T: Document> Repository<T> for MemoryRepository<T> {
    async fn select_any(&self, filter: Filter) -> Result<Vec<T>, DatabaseError> {
        let rows = self.rows.read().await;
        // Newest first; the sort is stable so ties keep that order.
        let candidates = rows.iter().rev().map(|r| (r.clone(), r.to_fields())).collect();
        Ok(filter.apply(candidates))
    }

    async fn count(&self, filter: Filter) -> Result<i64, DatabaseError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|r| filter.matches(&r.to_fields())).count() as i64)
    }

    async fn insert(&self, doc: T) -> Result<T, DatabaseError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.id() == doc.id()) {
            return Err(DatabaseError::Conflict(format!("{}_pkey", T::TABLE)));
        }
        Self::check_unique(&rows, &doc)?;
        rows.push(doc.clone());
        Ok(doc)
    }

    async fn update(&self, doc: T) -> Result<T, DatabaseError> {
        let mut rows = self.rows.write().await;
        Self::check_unique(&rows, &doc)?;
        match rows.iter_mut().find(|r| r.id() == doc.id()) {
            Some(slot) => {
                *slot = doc.clone();
                Ok(doc)
            }
            None => Err(DatabaseError::NotFound(format!("{} {}", T::TABLE, doc.id()))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        Ok(rows.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Role, TeamMember, User};

    #[tokio::test]
    async fn enforces_unique_columns() {
        let repo = MemoryRepository::<User>::new();
        repo.insert(User::new("A", "a@javelin.com", "h".into(), Role::Admin)).await.unwrap();
        let dup = repo.insert(User::new("B", "A@Javelin.com", "h".into(), Role::Admin)).await;
        assert!(matches!(dup, Err(DatabaseError::Conflict(_))));
        assert_eq!(repo.count(Filter::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_by_id() {
        let repo = MemoryRepository::<TeamMember>::new();
        let mut member = repo
            .insert(TeamMember::new("Ann", "Director", "Bio", "/a.jpg".into()))
            .await
            .unwrap();

        member.is_active = false;
        repo.update(member.clone()).await.unwrap();
        let active = repo.count(Filter::new().where_eq("is_active", true)).await.unwrap();
        assert_eq!(active, 0);

        assert!(repo.delete(member.id).await.unwrap());
        assert!(!repo.delete(member.id).await.unwrap());
        assert!(matches!(repo.update(member).await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn select_orders_ties_newest_first() {
        let repo = MemoryRepository::<TeamMember>::new();
        let first = repo.insert(TeamMember::new("First", "P", "B", "/1.jpg".into())).await.unwrap();
        let second = repo.insert(TeamMember::new("Second", "P", "B", "/2.jpg".into())).await.unwrap();

        let rows = repo.select_any(Filter::new().order("display_order asc")).await.unwrap();
        assert_eq!(rows[0].id, second.id);
        assert_eq!(rows[1].id, first.id);
        assert_eq!(repo.find_by_id(first.id).await.unwrap().map(|m| m.name), Some("First".to_string()));
    }
}

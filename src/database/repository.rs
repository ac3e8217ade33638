use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::document::Document;
use crate::database::manager::DatabaseError;
use crate::database::query_builder::{
    bind_param_query, bind_param_query_as, delete_sql, insert_sql, update_sql,
};
use crate::filter::Filter;

#[async_trait]
pub trait Repository<T: Document>: Send + Sync {
    async fn select_any(&self, filter: Filter) -> Result<Vec<T>, DatabaseError>;

    async fn count(&self, filter: Filter) -> Result<i64, DatabaseError>;

    async fn insert(&self, doc: T) -> Result<T, DatabaseError>;

    /// Writes every column of `doc`. Fails with `NotFound` if the row is gone.
    async fn update(&self, doc: T) -> Result<T, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn select_one(&self, filter: Filter) -> Result<Option<T>, DatabaseError> {
        Ok(self.select_any(filter.limit(1)).await?.into_iter().next())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        self.select_one(Filter::new().where_eq("id", id)).await
    }
}

pub struct PgRepository<T> {
    pool: PgPool,
    _phantom: PhantomData<T>,
}

impl<T: Document> PgRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, _phantom: PhantomData }
    }
}

#[async_trait]
impl<T: Document> Repository<T> for PgRepository<T> {
    async fn select_any(&self, filter: Filter) -> Result<Vec<T>, DatabaseError> {
        let sql = filter.to_sql(T::TABLE)?;
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn count(&self, filter: Filter) -> Result<i64, DatabaseError> {
        let sql = filter.to_count_sql(T::TABLE)?;
        let mut q = sqlx::query(&sql.query);
        for p in sql.params {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(&self.pool).await?;
        Ok(row.try_get("count")?)
    }

    async fn insert(&self, doc: T) -> Result<T, DatabaseError> {
        let sql = insert_sql(T::TABLE, doc.to_fields());
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params {
            q = bind_param_query_as(q, p);
        }
        q.fetch_one(&self.pool).await.map_err(map_write_error)
    }

    async fn update(&self, doc: T) -> Result<T, DatabaseError> {
        let sql = update_sql(T::TABLE, doc.to_fields());
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params {
            q = bind_param_query_as(q, p);
        }
        q.fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {}", T::TABLE, doc.id())))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = delete_sql(T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Unique violations (SQLSTATE 23505) become `Conflict`.
fn map_write_error(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(ref db) = err {
        if db.code().as_deref() == Some("23505") {
            let target = db.constraint().unwrap_or("unique constraint").to_string();
            return DatabaseError::Conflict(target);
        }
    }
    DatabaseError::Sqlx(err)
}

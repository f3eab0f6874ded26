//! Repository interface over plant rows, and its SQLite implementation.
//! Each write runs in its own transaction: commit on success, rollback on any failure.

use crate::error::AppError;
use crate::model::{NewPlant, Plant, PlantPatch};
use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

#[async_trait]
pub trait PlantRepository: Send + Sync {
    /// All rows, ascending id.
    async fn find_all(&self) -> Result<Vec<Plant>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Plant>, AppError>;
    /// Insert and return the stored row with its assigned id.
    async fn insert(&self, new: &NewPlant) -> Result<Plant, AppError>;
    /// Apply the patch to the row. `None` when the row does not exist.
    async fn update(&self, id: i64, patch: &PlantPatch) -> Result<Option<Plant>, AppError>;
    /// `false` when the row does not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}

const SELECT_COLUMNS: &str = "SELECT id, name, image, price FROM plants";

#[derive(Clone)]
pub struct SqlitePlantRepository {
    pool: SqlitePool,
}

impl SqlitePlantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqlitePlantRepository { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        self.pool.begin().await.map_err(AppError::from_write)
    }
}

/// Commit on success; otherwise roll back and classify the failure.
async fn finish<T>(tx: Transaction<'static, Sqlite>, result: Result<T, sqlx::Error>) -> Result<T, AppError> {
    match result {
        Ok(v) => {
            tx.commit().await.map_err(AppError::from_write)?;
            Ok(v)
        }
        Err(e) => {
            match tx.rollback().await {
                Ok(()) => tracing::warn!(error = %e, "transaction rolled back"),
                Err(rb) => tracing::error!(error = %rb, "rollback failed"),
            }
            Err(AppError::from_write(e))
        }
    }
}

async fn insert_row(conn: &mut SqliteConnection, new: &NewPlant) -> Result<Plant, sqlx::Error> {
    let sql = "INSERT INTO plants (name, image, price) VALUES (?, ?, ?) RETURNING id, name, image, price";
    tracing::debug!(sql = %sql, "query (tx)");
    sqlx::query_as::<_, Plant>(sql)
        .bind(&new.name)
        .bind(&new.image)
        .bind(new.price)
        .fetch_one(conn)
        .await
}

async fn update_row(conn: &mut SqliteConnection, id: i64, patch: &PlantPatch) -> Result<Option<Plant>, sqlx::Error> {
    let select = format!("{} WHERE id = ?", SELECT_COLUMNS);
    tracing::debug!(sql = %select, id, "query (tx)");
    let Some(mut plant) = sqlx::query_as::<_, Plant>(&select)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };
    if patch.is_empty() {
        return Ok(Some(plant));
    }
    plant.apply(patch);
    let sql = "UPDATE plants SET name = ?, image = ?, price = ? WHERE id = ?";
    tracing::debug!(sql = %sql, id, "query (tx)");
    sqlx::query(sql)
        .bind(&plant.name)
        .bind(&plant.image)
        .bind(plant.price)
        .bind(plant.id)
        .execute(&mut *conn)
        .await?;
    Ok(Some(plant))
}

async fn delete_row(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let sql = "DELETE FROM plants WHERE id = ?";
    tracing::debug!(sql = %sql, id, "query (tx)");
    let done = sqlx::query(sql).bind(id).execute(conn).await?;
    Ok(done.rows_affected() > 0)
}

#[async_trait]
impl PlantRepository for SqlitePlantRepository {
    async fn find_all(&self) -> Result<Vec<Plant>, AppError> {
        let sql = format!("{} ORDER BY id", SELECT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Plant>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Plant>, AppError> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Plant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, new: &NewPlant) -> Result<Plant, AppError> {
        let mut tx = self.begin().await?;
        let result = insert_row(&mut tx, new).await;
        finish(tx, result).await
    }

    async fn update(&self, id: i64, patch: &PlantPatch) -> Result<Option<Plant>, AppError> {
        let mut tx = self.begin().await?;
        let result = update_row(&mut tx, id, patch).await;
        finish(tx, result).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.begin().await?;
        let result = delete_row(&mut tx, id).await;
        finish(tx, result).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

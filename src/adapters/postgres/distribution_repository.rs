//! PostgreSQL implementation of DistributionRepository.
//!
//! Reports are stored whole as JSONB, one row per event. Writers take a
//! transaction-scoped advisory lock on the event id so concurrent runs for
//! the same event from different processes cannot interleave.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::domain::foundation::{DistributionId, DomainError, ErrorCode, EventId, Timestamp};
use crate::domain::seating::DistributionReport;
use crate::ports::{DistributionRepository, StoredDistribution};

/// PostgreSQL implementation of DistributionRepository.
#[derive(Clone)]
pub struct PostgresDistributionRepository {
    pool: PgPool,
}

impl PostgresDistributionRepository {
    /// Creates a new PostgresDistributionRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema migrations.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if a migration fails
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| db_error("apply migrations", e))
    }

    async fn begin_locked(
        &self,
        event_id: &EventId,
    ) -> Result<Transaction<'static, Postgres>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(event_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("lock event", e))?;

        Ok(tx)
    }
}

fn db_error(action: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", action, e),
    )
}

async fn insert(
    tx: &mut Transaction<'static, Postgres>,
    distribution: &StoredDistribution,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO seating_distributions (id, event_id, report, fingerprint, stored_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(distribution.id.as_uuid())
    .bind(distribution.event_id.as_str())
    .bind(Json(&distribution.report))
    .bind(&distribution.fingerprint)
    .bind(distribution.stored_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("insert distribution", e))?;
    Ok(())
}

fn row_to_distribution(row: PgRow) -> Result<StoredDistribution, DomainError> {
    let id: Uuid = row.try_get("id").map_err(|e| db_error("read id", e))?;
    let event_id: String = row
        .try_get("event_id")
        .map_err(|e| db_error("read event_id", e))?;
    let Json(report): Json<DistributionReport> = row
        .try_get("report")
        .map_err(|e| db_error("decode report", e))?;
    let fingerprint: String = row
        .try_get("fingerprint")
        .map_err(|e| db_error("read fingerprint", e))?;
    let stored_at: DateTime<Utc> = row
        .try_get("stored_at")
        .map_err(|e| db_error("read stored_at", e))?;

    Ok(StoredDistribution {
        id: DistributionId::from_uuid(id),
        event_id: EventId::new(event_id).map_err(|e| db_error("read event_id", e))?,
        report,
        fingerprint,
        stored_at: Timestamp::from_datetime(stored_at),
    })
}

#[async_trait]
impl DistributionRepository for PostgresDistributionRepository {
    async fn find_by_event(
        &self,
        event_id: &EventId,
    ) -> Result<Option<StoredDistribution>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, event_id, report, fingerprint, stored_at
            FROM seating_distributions
            WHERE event_id = $1
            "#,
        )
        .bind(event_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch distribution", e))?;

        row.map(row_to_distribution).transpose()
    }

    async fn replace(
        &self,
        distribution: &StoredDistribution,
    ) -> Result<Option<DistributionId>, DomainError> {
        let mut tx = self.begin_locked(&distribution.event_id).await?;

        let removed: Option<(Uuid,)> =
            sqlx::query_as("DELETE FROM seating_distributions WHERE event_id = $1 RETURNING id")
                .bind(distribution.event_id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| db_error("delete distribution", e))?;

        insert(&mut tx, distribution).await?;
        tx.commit()
            .await
            .map_err(|e| db_error("commit distribution", e))?;

        debug!(
            event_id = %distribution.event_id,
            distribution_id = %distribution.id,
            replaced = removed.is_some(),
            "distribution replaced"
        );
        Ok(removed.map(|(id,)| DistributionId::from_uuid(id)))
    }

    async fn insert_new(&self, distribution: &StoredDistribution) -> Result<(), DomainError> {
        let mut tx = self.begin_locked(&distribution.event_id).await?;

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM seating_distributions WHERE event_id = $1")
                .bind(distribution.event_id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| db_error("check distribution", e))?;

        if let Some((id,)) = existing {
            return Err(DomainError::new(
                ErrorCode::DistributionExists,
                format!(
                    "Event {} already has a distribution",
                    distribution.event_id
                ),
            )
            .with_detail("distribution_id", id.to_string()));
        }

        insert(&mut tx, distribution).await?;
        tx.commit()
            .await
            .map_err(|e| db_error("commit distribution", e))?;

        debug!(
            event_id = %distribution.event_id,
            distribution_id = %distribution.id,
            "distribution stored"
        );
        Ok(())
    }
}

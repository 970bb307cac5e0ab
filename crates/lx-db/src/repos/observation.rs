//! Observation repository.
//!
//! Create, update and delete write one audit row in the same transaction,
//! keyed by `"<country_id>:<year>"` with an [`ObservationDetail`] payload.

use lx_core::audit_detail::ObservationDetail;
use lx_core::entities::{Observation, ObservationUpdate};
use lx_core::enums::{AuditAction, EntityType};
use lx_core::ids::observation_key;
use lx_core::trend::SeriesPoint;

use crate::error::DatabaseError;
use crate::helpers::get_year;
use crate::repos::audit::insert_audit;
use crate::repos::geography::insert_year_if_missing;
use crate::service::{LxService, finish};

fn row_to_observation(row: &libsql::Row) -> Result<Observation, DatabaseError> {
    Ok(Observation {
        id: row.get::<i64>(0)?,
        country_id: row.get::<i64>(1)?,
        year: get_year(row, 2)?,
        value: row.get::<f64>(3)?,
    })
}

fn detail_json(detail: &ObservationDetail) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(detail).map_err(|e| DatabaseError::Other(e.into()))
}

impl LxService {
    /// Insert a new observation, adding `year` to `Years` if needed.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::Core` if `value` is out of range.
    /// - `DatabaseError::NotFound` if the country does not exist.
    /// - `DatabaseError::AlreadyExists` if the country already has a value for `year`.
    pub async fn create_observation(
        &self,
        country_id: i64,
        year: i32,
        value: f64,
    ) -> Result<Observation, DatabaseError> {
        Observation::validate_value(value)?;
        let _guard = self.lock_writes().await;

        self.get_country(country_id).await?;
        if self.find_observation(country_id, year).await?.is_some() {
            return Err(DatabaseError::AlreadyExists {
                entity: EntityType::Observation.to_string(),
                key: observation_key(country_id, year),
            });
        }

        let tx = self.begin().await?;
        let result = async {
            insert_year_if_missing(&tx, year).await?;
            tx.execute(
                "INSERT INTO Observations (country_id, year, value) VALUES (?1, ?2, ?3)",
                libsql::params![country_id, year, value],
            )
            .await?;
            let observation = Observation {
                id: tx.last_insert_rowid(),
                country_id,
                year,
                value,
            };
            let detail = ObservationDetail {
                country_id,
                year,
                previous_value: None,
                new_value: Some(value),
            };
            let audit = self
                .new_audit_entry(
                    EntityType::Observation,
                    observation_key(country_id, year),
                    AuditAction::Created,
                    Some(detail_json(&detail)?),
                )
                .await?;
            insert_audit(&tx, &audit).await?;
            tracing::debug!(country_id, year, audit_id = %audit.id, "observation created");
            Ok::<_, DatabaseError>(observation)
        }
        .await;
        finish(tx, result).await
    }

    /// Replace the value of an existing observation. The previous value is read
    /// under the write lock, so it is the one the audit entry records.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::Core` if `value` is out of range.
    /// - `DatabaseError::NotFound` if no observation exists for `(country_id, year)`.
    pub async fn update_observation(
        &self,
        country_id: i64,
        year: i32,
        value: f64,
    ) -> Result<ObservationUpdate, DatabaseError> {
        Observation::validate_value(value)?;
        let _guard = self.lock_writes().await;

        let existing = self
            .find_observation(country_id, year)
            .await?
            .ok_or_else(|| DatabaseError::not_found("observation", observation_key(country_id, year)))?;

        let tx = self.begin().await?;
        let result = async {
            tx.execute(
                "UPDATE Observations SET value = ?1 WHERE id = ?2",
                libsql::params![value, existing.id],
            )
            .await?;
            let detail = ObservationDetail {
                country_id,
                year,
                previous_value: Some(existing.value),
                new_value: Some(value),
            };
            let audit = self
                .new_audit_entry(
                    EntityType::Observation,
                    observation_key(country_id, year),
                    AuditAction::Updated,
                    Some(detail_json(&detail)?),
                )
                .await?;
            insert_audit(&tx, &audit).await?;
            tracing::debug!(country_id, year, audit_id = %audit.id, "observation updated");
            Ok::<_, DatabaseError>(ObservationUpdate {
                previous_value: existing.value,
                current: Observation { value, ..existing },
            })
        }
        .await;
        finish(tx, result).await
    }

    /// Delete an observation and return the removed row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no observation exists for `(country_id, year)`.
    pub async fn delete_observation(
        &self,
        country_id: i64,
        year: i32,
    ) -> Result<Observation, DatabaseError> {
        let _guard = self.lock_writes().await;

        let existing = self
            .find_observation(country_id, year)
            .await?
            .ok_or_else(|| DatabaseError::not_found("observation", observation_key(country_id, year)))?;

        let tx = self.begin().await?;
        let result = async {
            tx.execute("DELETE FROM Observations WHERE id = ?1", [existing.id])
                .await?;
            let detail = ObservationDetail {
                country_id,
                year,
                previous_value: Some(existing.value),
                new_value: None,
            };
            let audit = self
                .new_audit_entry(
                    EntityType::Observation,
                    observation_key(country_id, year),
                    AuditAction::Deleted,
                    Some(detail_json(&detail)?),
                )
                .await?;
            insert_audit(&tx, &audit).await?;
            tracing::debug!(country_id, year, audit_id = %audit.id, "observation deleted");
            Ok::<_, DatabaseError>(existing)
        }
        .await;
        finish(tx, result).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_observation(
        &self,
        country_id: i64,
        year: i32,
    ) -> Result<Option<Observation>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, country_id, year, value FROM Observations
                 WHERE country_id = ?1 AND year = ?2",
                libsql::params![country_id, year],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_observation(&row)?)),
            None => Ok(None),
        }
    }

    /// All observations of a country, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_observations(&self, country_id: i64) -> Result<Vec<Observation>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, country_id, year, value FROM Observations
                 WHERE country_id = ?1 ORDER BY year ASC",
                [country_id],
            )
            .await?;
        let mut observations = Vec::new();
        while let Some(row) = rows.next().await? {
            observations.push(row_to_observation(&row)?);
        }
        Ok(observations)
    }

    /// Predictor input for one country, ordered by year ascending.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn prediction_series(&self, country_id: i64) -> Result<Vec<SeriesPoint>, DatabaseError> {
        Ok(self
            .list_observations(country_id)
            .await?
            .iter()
            .map(Observation::point)
            .collect())
    }
}

//! Dashboard report queries. Read-only.

use lx_core::responses::{CountryLatest, RankedCountry, SubRegionAverage, YearValue};

use crate::error::DatabaseError;
use crate::helpers::{get_year, like_contains};
use crate::service::LxService;

impl LxService {
    /// A country's history, most recent year first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn country_history(&self, country_id: i64) -> Result<Vec<YearValue>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT o.year, o.value FROM Observations o
                 WHERE o.country_id = ?1
                 ORDER BY o.year DESC",
                [country_id],
            )
            .await?;
        let mut history = Vec::new();
        while let Some(row) = rows.next().await? {
            history.push(YearValue {
                year: get_year(&row, 0)?,
                value: row.get::<f64>(1)?,
            });
        }
        Ok(history)
    }

    /// Countries of a sub-region ranked by their value in `year`, lowest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn sub_region_ranking(
        &self,
        sub_region_id: i64,
        year: i32,
    ) -> Result<Vec<RankedCountry>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT c.name, o.value
                 FROM Countries c
                 JOIN Observations o ON c.id = o.country_id
                 WHERE c.sub_region_id = ?1 AND o.year = ?2
                 ORDER BY o.value ASC, c.name ASC",
                libsql::params![sub_region_id, year],
            )
            .await?;
        let mut ranking = Vec::new();
        let mut rank = 0u32;
        while let Some(row) = rows.next().await? {
            rank += 1;
            ranking.push(RankedCountry {
                rank,
                country_name: row.get::<String>(0)?,
                life_expectancy: row.get::<f64>(1)?,
            });
        }
        Ok(ranking)
    }

    /// Mean value per sub-region of a region in `year`, lowest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn region_averages(
        &self,
        region_id: i64,
        year: i32,
    ) -> Result<Vec<SubRegionAverage>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT sr.name, AVG(o.value) AS average_le
                 FROM SubRegions sr
                 JOIN Countries c ON sr.id = c.sub_region_id
                 JOIN Observations o ON c.id = o.country_id
                 WHERE sr.region_id = ?1 AND o.year = ?2
                 GROUP BY sr.id, sr.name
                 ORDER BY average_le ASC, sr.name ASC",
                libsql::params![region_id, year],
            )
            .await?;
        let mut averages = Vec::new();
        while let Some(row) = rows.next().await? {
            averages.push(SubRegionAverage {
                sub_region_name: row.get::<String>(0)?,
                average_le: row.get::<f64>(1)?,
            });
        }
        Ok(averages)
    }

    /// Countries whose name contains `keyword`, each with its latest observation.
    ///
    /// Countries without observations are omitted. `%` and `_` in the keyword
    /// match literally.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn search_latest(&self, keyword: &str) -> Result<Vec<CountryLatest>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT c.name, o.year, o.value
                 FROM Countries c
                 JOIN Observations o ON c.id = o.country_id
                 WHERE c.name LIKE ?1 ESCAPE '\\'
                   AND o.year = (
                       SELECT MAX(year) FROM Observations WHERE country_id = c.id
                   )
                 ORDER BY c.name ASC",
                [like_contains(keyword)],
            )
            .await?;
        let mut matches = Vec::new();
        while let Some(row) = rows.next().await? {
            matches.push(CountryLatest {
                country_name: row.get::<String>(0)?,
                year: get_year(&row, 1)?,
                value: row.get::<f64>(2)?,
            });
        }
        Ok(matches)
    }
}

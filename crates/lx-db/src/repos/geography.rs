//! Geography repository: regions, sub-regions, intermediate regions,
//! countries and the `Years` dimension.

use lx_core::entities::{Country, IntermediateRegion, Region, SubRegion};
use lx_core::enums::{AuditAction, EntityType};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_i64, get_opt_string, get_year};
use crate::repos::audit::insert_audit;
use crate::service::{LxService, finish};

/// Input for [`LxService::create_country`].
#[derive(Debug, Clone, Default)]
pub struct NewCountry {
    pub name: String,
    pub alpha3: Option<String>,
    pub sub_region_id: Option<i64>,
    pub intermediate_region_id: Option<i64>,
}

fn row_to_country(row: &libsql::Row) -> Result<Country, DatabaseError> {
    Ok(Country {
        id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        alpha3: get_opt_string(row, 2)?,
        sub_region_id: get_opt_i64(row, 3)?,
        intermediate_region_id: get_opt_i64(row, 4)?,
    })
}

const COUNTRY_COLUMNS: &str = "id, name, alpha3, sub_region_id, intermediate_region_id";

/// Insert `year` into `Years` if absent. Returns whether a row was added.
pub(crate) async fn insert_year_if_missing(
    conn: &libsql::Connection,
    year: i32,
) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute("INSERT OR IGNORE INTO Years (year) VALUES (?1)", [year])
        .await?;
    Ok(changed > 0)
}

impl LxService {
    // -----------------------------------------------------------------------
    // Regions
    // -----------------------------------------------------------------------

    pub async fn create_region(&self, name: &str) -> Result<Region, DatabaseError> {
        let _guard = self.lock_writes().await;
        let tx = self.begin().await?;
        let result = async {
            tx.execute("INSERT INTO Regions (name) VALUES (?1)", [name])
                .await?;
            let region = Region {
                id: tx.last_insert_rowid(),
                name: name.to_string(),
            };
            let audit = self
                .new_audit_entry(EntityType::Region, region.id.to_string(), AuditAction::Created, None)
                .await?;
            insert_audit(&tx, &audit).await?;
            Ok::<_, DatabaseError>(region)
        }
        .await;
        finish(tx, result).await
    }

    pub async fn list_regions(&self) -> Result<Vec<Region>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id, name FROM Regions ORDER BY name ASC", ())
            .await?;
        let mut regions = Vec::new();
        while let Some(row) = rows.next().await? {
            regions.push(Region {
                id: row.get::<i64>(0)?,
                name: row.get::<String>(1)?,
            });
        }
        Ok(regions)
    }

    // -----------------------------------------------------------------------
    // Sub-regions
    // -----------------------------------------------------------------------

    pub async fn create_sub_region(
        &self,
        region_id: i64,
        name: &str,
    ) -> Result<SubRegion, DatabaseError> {
        let _guard = self.lock_writes().await;
        let tx = self.begin().await?;
        let result = async {
            tx.execute(
                "INSERT INTO SubRegions (name, region_id) VALUES (?1, ?2)",
                libsql::params![name, region_id],
            )
            .await?;
            let sub_region = SubRegion {
                id: tx.last_insert_rowid(),
                name: name.to_string(),
                region_id,
            };
            let audit = self
                .new_audit_entry(
                    EntityType::SubRegion,
                    sub_region.id.to_string(),
                    AuditAction::Created,
                    None,
                )
                .await?;
            insert_audit(&tx, &audit).await?;
            Ok::<_, DatabaseError>(sub_region)
        }
        .await;
        finish(tx, result).await
    }

    pub async fn list_sub_regions(&self) -> Result<Vec<SubRegion>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, name, region_id FROM SubRegions ORDER BY name ASC",
                (),
            )
            .await?;
        let mut sub_regions = Vec::new();
        while let Some(row) = rows.next().await? {
            sub_regions.push(SubRegion {
                id: row.get::<i64>(0)?,
                name: row.get::<String>(1)?,
                region_id: row.get::<i64>(2)?,
            });
        }
        Ok(sub_regions)
    }

    // -----------------------------------------------------------------------
    // Intermediate regions
    // -----------------------------------------------------------------------

    pub async fn create_intermediate_region(
        &self,
        sub_region_id: i64,
        name: &str,
    ) -> Result<IntermediateRegion, DatabaseError> {
        let _guard = self.lock_writes().await;
        let tx = self.begin().await?;
        let result = async {
            tx.execute(
                "INSERT INTO IntermediateRegions (name, sub_region_id) VALUES (?1, ?2)",
                libsql::params![name, sub_region_id],
            )
            .await?;
            let region = IntermediateRegion {
                id: tx.last_insert_rowid(),
                name: name.to_string(),
                sub_region_id,
            };
            let audit = self
                .new_audit_entry(
                    EntityType::IntermediateRegion,
                    region.id.to_string(),
                    AuditAction::Created,
                    None,
                )
                .await?;
            insert_audit(&tx, &audit).await?;
            Ok::<_, DatabaseError>(region)
        }
        .await;
        finish(tx, result).await
    }

    /// List intermediate regions, optionally restricted to one sub-region.
    pub async fn list_intermediate_regions(
        &self,
        sub_region_id: Option<i64>,
    ) -> Result<Vec<IntermediateRegion>, DatabaseError> {
        let mut rows = match sub_region_id {
            Some(id) => {
                self.db()
                    .conn()
                    .query(
                        "SELECT id, name, sub_region_id FROM IntermediateRegions
                         WHERE sub_region_id = ?1 ORDER BY name ASC",
                        [id],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        "SELECT id, name, sub_region_id FROM IntermediateRegions ORDER BY name ASC",
                        (),
                    )
                    .await?
            }
        };
        let mut regions = Vec::new();
        while let Some(row) = rows.next().await? {
            regions.push(IntermediateRegion {
                id: row.get::<i64>(0)?,
                name: row.get::<String>(1)?,
                sub_region_id: row.get::<i64>(2)?,
            });
        }
        Ok(regions)
    }

    // -----------------------------------------------------------------------
    // Countries
    // -----------------------------------------------------------------------

    pub async fn create_country(&self, new: &NewCountry) -> Result<Country, DatabaseError> {
        let _guard = self.lock_writes().await;
        if self.find_country_by_name(&new.name).await?.is_some() {
            return Err(DatabaseError::AlreadyExists {
                entity: EntityType::Country.to_string(),
                key: new.name.clone(),
            });
        }

        let tx = self.begin().await?;
        let result = async {
            tx.execute(
                "INSERT INTO Countries (name, alpha3, sub_region_id, intermediate_region_id)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    new.name.as_str(),
                    new.alpha3.as_deref(),
                    new.sub_region_id,
                    new.intermediate_region_id
                ],
            )
            .await?;
            let country = Country {
                id: tx.last_insert_rowid(),
                name: new.name.clone(),
                alpha3: new.alpha3.clone(),
                sub_region_id: new.sub_region_id,
                intermediate_region_id: new.intermediate_region_id,
            };
            let audit = self
                .new_audit_entry(
                    EntityType::Country,
                    country.id.to_string(),
                    AuditAction::Created,
                    Some(serde_json::json!({ "name": country.name })),
                )
                .await?;
            insert_audit(&tx, &audit).await?;
            Ok::<_, DatabaseError>(country)
        }
        .await;
        finish(tx, result).await
    }

    pub async fn get_country(&self, id: i64) -> Result<Country, DatabaseError> {
        let sql = format!("SELECT {COUNTRY_COLUMNS} FROM Countries WHERE id = ?1");
        let mut rows = self.db().conn().query(&sql, [id]).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("country", id))?;
        row_to_country(&row)
    }

    /// Case-insensitive exact name lookup.
    pub async fn find_country_by_name(&self, name: &str) -> Result<Option<Country>, DatabaseError> {
        let sql = format!(
            "SELECT {COUNTRY_COLUMNS} FROM Countries WHERE name = ?1 COLLATE NOCASE LIMIT 1"
        );
        let mut rows = self.db().conn().query(&sql, [name]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_country(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_countries(&self) -> Result<Vec<Country>, DatabaseError> {
        let sql = format!("SELECT {COUNTRY_COLUMNS} FROM Countries ORDER BY name ASC");
        let mut rows = self.db().conn().query(&sql, ()).await?;
        let mut countries = Vec::new();
        while let Some(row) = rows.next().await? {
            countries.push(row_to_country(&row)?);
        }
        Ok(countries)
    }

    // -----------------------------------------------------------------------
    // Years
    // -----------------------------------------------------------------------

    /// Add a year to the `Years` dimension. Returns `false` if it already existed.
    pub async fn create_year(&self, year: i32) -> Result<bool, DatabaseError> {
        let _guard = self.lock_writes().await;
        let tx = self.begin().await?;
        let result = async {
            let inserted = insert_year_if_missing(&tx, year).await?;
            if inserted {
                let audit = self
                    .new_audit_entry(EntityType::Year, year.to_string(), AuditAction::Created, None)
                    .await?;
                insert_audit(&tx, &audit).await?;
            }
            Ok::<_, DatabaseError>(inserted)
        }
        .await;
        finish(tx, result).await
    }

    /// All known years, most recent first.
    pub async fn list_years(&self) -> Result<Vec<i32>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT year FROM Years ORDER BY year DESC", ())
            .await?;
        let mut years = Vec::new();
        while let Some(row) = rows.next().await? {
            years.push(get_year(&row, 0)?);
        }
        Ok(years)
    }
}

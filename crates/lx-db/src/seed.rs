//! Demonstration dataset for local use and tests.
//!
//! Seeding is idempotent: rows are matched by name (or `(country, year)`) and
//! only missing ones are inserted, so running it twice changes nothing.

use std::collections::HashMap;

use crate::error::DatabaseError;
use crate::repos::geography::NewCountry;
use crate::service::LxService;

/// Years covered by the demo observations.
pub const SEED_YEARS: [i32; 5] = [2000, 2005, 2010, 2015, 2020];

/// `(region, sub_region, intermediate_region)`
const GEOGRAPHY: &[(&str, &str, Option<&str>)] = &[
    ("Americas", "Latin America and the Caribbean", Some("South America")),
    ("Americas", "Latin America and the Caribbean", Some("Caribbean")),
    ("Americas", "Northern America", None),
    ("Europe", "Western Europe", None),
    ("Africa", "Sub-Saharan Africa", Some("Eastern Africa")),
    ("Africa", "Sub-Saharan Africa", Some("Western Africa")),
    ("Africa", "Northern Africa", None),
    ("Asia", "Eastern Asia", None),
    ("Oceania", "Australia and New Zealand", None),
];

struct SeedCountry {
    name: &'static str,
    alpha3: &'static str,
    sub_region: Option<&'static str>,
    intermediate_region: Option<&'static str>,
    values: [f64; 5],
}

const COUNTRIES: &[SeedCountry] = &[
    SeedCountry {
        name: "Chile",
        alpha3: "CHL",
        sub_region: Some("Latin America and the Caribbean"),
        intermediate_region: Some("South America"),
        values: [76.8, 77.9, 78.9, 79.6, 80.2],
    },
    SeedCountry {
        name: "Peru",
        alpha3: "PER",
        sub_region: Some("Latin America and the Caribbean"),
        intermediate_region: Some("South America"),
        values: [70.5, 72.4, 74.1, 75.5, 76.2],
    },
    SeedCountry {
        name: "Brazil",
        alpha3: "BRA",
        sub_region: Some("Latin America and the Caribbean"),
        intermediate_region: Some("South America"),
        values: [70.1, 72.1, 73.6, 75.0, 74.0],
    },
    SeedCountry {
        name: "Haiti",
        alpha3: "HTI",
        sub_region: Some("Latin America and the Caribbean"),
        intermediate_region: Some("Caribbean"),
        values: [57.0, 58.9, 60.8, 62.7, 64.1],
    },
    SeedCountry {
        name: "Canada",
        alpha3: "CAN",
        sub_region: Some("Northern America"),
        intermediate_region: None,
        values: [79.2, 80.1, 81.2, 81.9, 81.7],
    },
    SeedCountry {
        name: "United States of America",
        alpha3: "USA",
        sub_region: Some("Northern America"),
        intermediate_region: None,
        values: [76.8, 77.4, 78.5, 78.7, 77.0],
    },
    SeedCountry {
        name: "Germany",
        alpha3: "DEU",
        sub_region: Some("Western Europe"),
        intermediate_region: None,
        values: [78.0, 79.1, 80.0, 80.6, 81.0],
    },
    SeedCountry {
        name: "France",
        alpha3: "FRA",
        sub_region: Some("Western Europe"),
        intermediate_region: None,
        values: [79.0, 80.2, 81.4, 82.3, 82.2],
    },
    SeedCountry {
        name: "Kenya",
        alpha3: "KEN",
        sub_region: Some("Sub-Saharan Africa"),
        intermediate_region: Some("Eastern Africa"),
        values: [51.0, 54.0, 58.9, 62.4, 61.4],
    },
    SeedCountry {
        name: "Nigeria",
        alpha3: "NGA",
        sub_region: Some("Sub-Saharan Africa"),
        intermediate_region: Some("Western Africa"),
        values: [46.3, 48.3, 50.9, 53.0, 52.9],
    },
    SeedCountry {
        name: "Egypt",
        alpha3: "EGY",
        sub_region: Some("Northern Africa"),
        intermediate_region: None,
        values: [68.6, 69.5, 70.3, 71.0, 70.2],
    },
    SeedCountry {
        name: "Japan",
        alpha3: "JPN",
        sub_region: Some("Eastern Asia"),
        intermediate_region: None,
        values: [81.2, 82.0, 82.8, 83.8, 84.6],
    },
    SeedCountry {
        name: "China",
        alpha3: "CHN",
        sub_region: Some("Eastern Asia"),
        intermediate_region: None,
        values: [71.4, 73.8, 75.0, 76.1, 77.9],
    },
    SeedCountry {
        name: "Australia",
        alpha3: "AUS",
        sub_region: Some("Australia and New Zealand"),
        intermediate_region: None,
        values: [79.2, 80.8, 81.7, 82.4, 83.2],
    },
    // Aggregate row, no geography
    SeedCountry {
        name: "World",
        alpha3: "WLD",
        sub_region: None,
        intermediate_region: None,
        values: [67.5, 69.0, 70.6, 72.0, 72.5],
    },
];

/// Rows inserted by one [`seed_demo`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub regions: usize,
    pub sub_regions: usize,
    pub intermediate_regions: usize,
    pub countries: usize,
    pub observations: usize,
}

impl SeedSummary {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.regions == 0
            && self.sub_regions == 0
            && self.intermediate_regions == 0
            && self.countries == 0
            && self.observations == 0
    }
}

/// Insert the demonstration dataset, skipping rows that already exist.
///
/// # Errors
///
/// Returns `DatabaseError` if any insert fails.
pub async fn seed_demo(svc: &LxService) -> Result<SeedSummary, DatabaseError> {
    let mut summary = SeedSummary::default();

    let mut regions: HashMap<String, i64> = svc
        .list_regions()
        .await?
        .into_iter()
        .map(|r| (r.name, r.id))
        .collect();
    let mut sub_regions: HashMap<String, i64> = svc
        .list_sub_regions()
        .await?
        .into_iter()
        .map(|s| (s.name, s.id))
        .collect();
    let mut intermediate: HashMap<String, i64> = svc
        .list_intermediate_regions(None)
        .await?
        .into_iter()
        .map(|i| (i.name, i.id))
        .collect();

    for &(region, sub_region, intermediate_region) in GEOGRAPHY {
        let region_id = if let Some(&id) = regions.get(region) {
            id
        } else {
            let created = svc.create_region(region).await?;
            summary.regions += 1;
            regions.insert(created.name, created.id);
            created.id
        };

        let sub_region_id = if let Some(&id) = sub_regions.get(sub_region) {
            id
        } else {
            let created = svc.create_sub_region(region_id, sub_region).await?;
            summary.sub_regions += 1;
            sub_regions.insert(created.name, created.id);
            created.id
        };

        if let Some(name) = intermediate_region
            && !intermediate.contains_key(name)
        {
            let created = svc.create_intermediate_region(sub_region_id, name).await?;
            summary.intermediate_regions += 1;
            intermediate.insert(created.name, created.id);
        }
    }

    for country in COUNTRIES {
        let country_id = if let Some(existing) = svc.find_country_by_name(country.name).await? {
            existing.id
        } else {
            let created = svc
                .create_country(&NewCountry {
                    name: country.name.to_string(),
                    alpha3: Some(country.alpha3.to_string()),
                    sub_region_id: country.sub_region.and_then(|s| sub_regions.get(s).copied()),
                    intermediate_region_id: country
                        .intermediate_region
                        .and_then(|i| intermediate.get(i).copied()),
                })
                .await?;
            summary.countries += 1;
            created.id
        };

        for (&year, &value) in SEED_YEARS.iter().zip(country.values.iter()) {
            if svc.find_observation(country_id, year).await?.is_none() {
                svc.create_observation(country_id, year, value).await?;
                summary.observations += 1;
            }
        }
    }

    tracing::info!(
        countries = summary.countries,
        observations = summary.observations,
        "demo dataset seeded"
    );
    Ok(summary)
}

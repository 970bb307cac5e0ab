//! Entity structs for the Lifex relational dataset.
//!
//! Each entity maps to a table in the libSQL database (see
//! `lx-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize` and `JsonSchema`.

mod audit;
mod geography;
mod observation;

pub use audit::AuditEntry;
pub use geography::{Country, IntermediateRegion, Region, SubRegion};
pub use observation::{MAX_LIFE_EXPECTANCY, Observation, ObservationUpdate};

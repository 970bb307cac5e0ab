//! Repository modules for the Lifex dataset.
//!
//! Each module adds methods to `LxService` via `impl LxService` blocks.

pub mod audit;
pub mod geography;
pub mod observation;
pub mod report;

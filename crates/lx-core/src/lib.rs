//! # lx-core
//!
//! Core types and the trend predictor for Lifex.
//!
//! This crate provides the foundational types shared across all Lifex crates:
//! - Entity structs for the relational dataset (regions, countries, observations)
//! - Entity type, audit action and trend enums
//! - The least-squares trend predictor
//! - Report row types handed to the views
//! - Audit detail payloads and ID helpers
//! - Cross-cutting error types
//!
//! Nothing here performs I/O.

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod trend;

//! Shared domain vocabulary for the raster-ingestion automation clients.
//!
//! Pure types and logic only — no I/O. Network clients live in the
//! `rasterflow-jobs` crate.

pub mod retry;
pub mod status;
pub mod types;

//! REST client for the job-manager service of the raster-ingestion
//! pipeline.
//!
//! Provides typed wire models, a [`JobManagerClient`] covering the jobs
//! and tasks endpoints, a response translator for uniform
//! status-plus-body handling, and a completion watcher that follows an
//! ingestion job until it reaches a terminal status.
//!
//! [`JobManagerClient`]: api::JobManagerClient

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod translate;
pub mod watch;

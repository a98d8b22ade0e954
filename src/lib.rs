//! LGPD Diagnostic API Library
//!
//! Scores the LGPD self-diagnostic questionnaire submitted from the marketing
//! site, generates recommendations, records the submitter as a CRM lead and
//! stores the diagnostic.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `app`: Router assembly and OpenAPI document.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `db_storage`: Client and diagnostic persistence.
//! - `diagnostic`: Validation, scoring, classification and recommendations.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `notifications`: Commercial-team notification content.
//! - `recommendations`: Static recommendation catalog.

pub mod api;
pub mod core;

// Re-export primary modules for shared use in tests and other binaries
pub mod app;
pub mod config;
pub mod db;
pub mod db_storage;
pub mod diagnostic;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notifications;
pub mod recommendations;

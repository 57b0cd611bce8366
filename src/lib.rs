//! OpenSASE Catalog Admin
//!
//! Backend-for-frontend for the commerce admin console's catalog screens.
//!
//! ## Features
//! - Four-level category hierarchy derived from `parentId` references
//! - Cascading category selection for the product form
//! - Product filtering by per-level category ids (or names resolved to ids) and free text
//! - Process-wide catalog cache with last-issued-wins refresh

pub mod api;
pub mod catalog;
pub mod config;
pub mod domain;

use thiserror::Error;
use crate::config::ConfigError;
use crate::domain::value_objects::LevelError;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Commerce API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Commerce API returned {status} for {url}")]
    Upstream { status: u16, url: String },

    #[error("Invalid category level: {0}")]
    InvalidLevel(#[from] LevelError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

//! Content client for a Strapi-backed portfolio site.
//!
//! The CMS serves hero, about, project, CV and related content under its
//! `/api` prefix in two possible envelope shapes. This crate normalizes
//! both into one flat record, memoizes fetches behind a TTL +
//! single-flight cache, and exposes one fail-open accessor per resource
//! through [`ContentService`].

pub mod cache;
pub mod cms;
pub mod config;
pub mod content;
pub mod error;
pub mod normalize;

pub use config::Config;
pub use content::ContentService;
pub use error::Error;

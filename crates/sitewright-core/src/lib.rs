//! Sitewright Core Library
//!
//! Core types, configuration, and error handling for the Sitewright site
//! composition system.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;

pub use config::Config;
pub use content::{ContentItem, ContentKind, SourcePath};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;

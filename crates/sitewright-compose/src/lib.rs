//! Sitewright Compose Library
//!
//! Content source resolution, plugin registry, and site composition.
//!
//! # Modules
//!
//! - [`source`] - Content source registration and filesystem discovery
//! - [`plugin`] - Capability-set plugin interface and registry
//! - [`compose`] - Composition of config, sources, and plugins into a route table

pub mod compose;
pub mod plugin;
pub mod source;

pub use compose::{ComposeError, ComposeStats, Composer, PageDescriptor, Site};
pub use plugin::{Capability, ContentDirPlugin, HookError, HookResult, Plugin, PluginRegistry};
pub use source::{ContentSource, SourceError, SourceSet};

//! Plugin registry with a capability-set interface.
//!
//! Plugins expose optional build-time hooks. The registry queries each
//! plugin's declared capabilities and only invokes the hooks a plugin
//! declares, in strict registration order.

use sitewright_core::CoreError;
use tracing::debug;

use crate::{compose::PageDescriptor, source::ContentSource};

/// Boxed error type returned from plugin hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for plugin hooks.
pub type HookResult<T> = std::result::Result<T, HookError>;

/// A capability a plugin may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The plugin contributes a content source.
    ContentSource,
    /// The plugin transforms the site stylesheet.
    StyleTransform,
    /// The plugin decorates assembled pages.
    PageDecoration,
}

/// A build-time extension unit with optional hooks.
///
/// Hooks are only invoked when the matching capability is declared; the
/// registry never probes hooks dynamically. Plugins live for a single build
/// and carry no persisted state.
pub trait Plugin: Send + Sync {
    /// Plugin name, attached to any hook failure.
    fn name(&self) -> &str;

    /// The capabilities this plugin declares.
    fn capabilities(&self) -> &[Capability];

    /// Contribute a content source to the build.
    fn content_source(&self) -> Option<ContentSource> {
        None
    }

    /// Transform the cumulative stylesheet.
    fn transform_styles(&self, input: &str) -> HookResult<String> {
        Ok(input.to_string())
    }

    /// Decorate a page in the cumulative page set.
    fn decorate_page(&self, route: &str, page: &mut PageDescriptor) -> HookResult<()> {
        let _ = (route, page);
        Ok(())
    }
}

/// Ordered list of registered plugins.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin. Plugins are applied in registration order.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        debug!(plugin = plugin.name(), "registered plugin");
        self.plugins.push(plugin);
    }

    /// Registered plugins in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.plugins.iter().map(Box::as_ref)
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}

/// Built-in plugin wrapping a plain content source declared via options.
///
/// Lets a directory of content be registered through the plugin table, the
/// same way a generic collection plugin gets repurposed for tutorials or
/// posts. The contributed source goes through the same route-conflict
/// checks as configured sources.
#[derive(Debug, Clone)]
pub struct ContentDirPlugin {
    source: ContentSource,
}

impl ContentDirPlugin {
    /// Name under which this plugin is registered in configuration.
    pub const NAME: &'static str = "content-dir";

    /// Create the plugin from an explicit source.
    #[must_use]
    pub fn new(source: ContentSource) -> Self {
        Self { source }
    }

    /// Create the plugin from configuration options
    /// (`id`, `root`, `route_base`).
    pub fn from_options(options: &toml::Table) -> Result<Self, CoreError> {
        let field = |key: &str| {
            options.get(key).and_then(|v| v.as_str()).ok_or_else(|| {
                CoreError::config(format!(
                    "plugin {:?} requires a string option {key:?}",
                    Self::NAME
                ))
            })
        };

        let id = field("id")?;
        let root = field("root")?;
        let route_base = field("route_base")?;

        Ok(Self::new(ContentSource::new(id, root, route_base)))
    }
}

impl Plugin for ContentDirPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::ContentSource]
    }

    fn content_source(&self) -> Option<ContentSource> {
        Some(self.source.clone())
    }
}

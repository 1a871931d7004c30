//! Command implementations.

pub mod build;
pub mod check;

use color_eyre::eyre::{Result, bail};
use sitewright_compose::{ContentDirPlugin, Plugin, PluginRegistry};
use sitewright_core::Config;

/// Build the plugin registry from the configuration's plugin entries.
///
/// Plugin names map to built-in constructors; an unknown name is a
/// configuration error.
pub fn plugin_registry(config: &Config) -> Result<PluginRegistry> {
    let mut registry = PluginRegistry::new();

    for entry in &config.plugins {
        let plugin: Box<dyn Plugin> = match entry.name.as_str() {
            ContentDirPlugin::NAME => Box::new(ContentDirPlugin::from_options(&entry.options)?),
            other => bail!("unknown plugin {other:?}"),
        };
        registry.register(plugin);
    }

    Ok(registry)
}

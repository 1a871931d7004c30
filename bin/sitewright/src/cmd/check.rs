//! Check command - validate configuration and content sources

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use sitewright_compose::{ContentSource, SourceSet};
use sitewright_core::Config;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration, content source roots, route bases, and plugin
/// entries without composing the site.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and sources");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref cfg) = config {
        println!("\nChecking content sources...");
        check_sources(cfg, &mut result);

        println!("\nChecking plugins...");
        check_plugins(cfg, &mut result);

        println!("\nChecking navigation...");
        check_navigation(cfg, &mut result);
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Check source roots and route base registration.
fn check_sources(config: &Config, result: &mut ValidationResult) {
    let mut set = SourceSet::new();

    for sc in &config.sources {
        match set.register(ContentSource::new(&sc.id, &sc.root, &sc.route_base)) {
            Ok(source) => {
                if !source.root.is_dir() {
                    result.add_error(format!(
                        "source {:?}: root {} does not exist",
                        source.id,
                        source.root.display()
                    ));
                } else if source
                    .root
                    .read_dir()
                    .map(|mut entries| entries.next().is_none())
                    .unwrap_or(false)
                {
                    result.add_warning(format!(
                        "source {:?}: root {} is empty",
                        source.id,
                        source.root.display()
                    ));
                }
            }
            Err(e) => result.add_error(e.to_string()),
        }
    }
}

/// Check that every plugin entry maps to a known plugin.
fn check_plugins(config: &Config, result: &mut ValidationResult) {
    match super::plugin_registry(config) {
        Ok(registry) => {
            if !registry.is_empty() {
                println!("  ✓ {} plugin(s) resolved", registry.len());
            }
        }
        Err(e) => result.add_error(format!("Plugin error: {e}")),
    }
}

/// Warn about internal navigation targets no source can contribute.
fn check_navigation(config: &Config, result: &mut ValidationResult) {
    let bases: Vec<_> = config
        .sources
        .iter()
        .map(|s| sitewright_compose::source::normalize_base(&s.route_base))
        .collect();

    for item in &config.navbar.items {
        if !item.is_internal() {
            continue;
        }

        let covered = bases
            .iter()
            .any(|base| base == "/" || item.target == *base || item.target.starts_with(&format!("{base}/")));

        if !covered {
            result.add_warning(format!(
                "navbar item {:?} targets {:?}, which no configured source covers",
                item.label, item.target
            ));
        }
    }
}

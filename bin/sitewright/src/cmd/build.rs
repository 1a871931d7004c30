//! Build command - composes the site and writes the route table manifest

use std::{fs, path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use sitewright_compose::Composer;
use sitewright_core::Config;

/// Default stylesheet input, fed through style-transforming plugins.
const STYLES_INPUT: &str = "styles/custom.css";

/// Run the build command.
///
/// Composes the site from configuration and content sources, then writes
/// the route table manifest and the transformed stylesheet for the external
/// renderer.
pub fn run(config_path: &Path, output: &Path, drafts: bool, base_url: Option<&str>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, drafts, ?base_url, "Starting build");

    let mut config = Config::load(config_path).wrap_err("Failed to load configuration")?;

    // Override the base URL if specified via CLI
    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base URL from CLI");
        config.site.base_url = url.to_string();
    }

    let registry = super::plugin_registry(&config)?;

    let mut composer = Composer::new(config)
        .with_plugins(registry)
        .with_drafts(drafts);

    // Auto-detect the stylesheet input alongside the content directories
    let styles_input = Path::new(STYLES_INPUT);
    if styles_input.is_file() {
        tracing::info!(path = %styles_input.display(), "Found stylesheet input");
        let styles = fs::read_to_string(styles_input)?;
        composer = composer.with_styles(styles);
    }

    let site = composer.compose().wrap_err("Composition failed")?;

    fs::create_dir_all(output)?;

    let manifest = serde_json::json!({
        "site": site.config,
        "routes": site.routes,
        "stats": site.stats,
    });
    let manifest_path = output.join("routes.json");
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
    tracing::info!(path = %manifest_path.display(), "wrote route table manifest");

    if !site.styles.is_empty() {
        let styles_path = output.join("site.css");
        fs::write(&styles_path, &site.styles)?;
        tracing::info!(path = %styles_path.display(), "wrote stylesheet");
    }

    let duration = start.elapsed();

    // Print composition statistics
    println!();
    println!("  Composition completed successfully!");
    println!();
    println!("  Sources:  {}", site.stats.sources);
    println!("  Routes:   {}", site.stats.pages);
    println!("  Plugins:  {}", site.stats.plugins);
    println!();
    println!("  Duration: {:.2}s", duration.as_secs_f64());
    println!("  Output:   {}", output.display());
    println!();

    tracing::info!(?duration, "Build completed successfully");

    Ok(())
}

//! Site configuration management.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, Result};

/// Main configuration structure for Sitewright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Locale settings.
    #[serde(default)]
    pub i18n: I18nConfig,

    /// Theme tokens and code highlighting.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Announcement bar shown above the navbar.
    #[serde(default)]
    pub announcement: Option<AnnouncementConfig>,

    /// Top navigation bar.
    #[serde(default)]
    pub navbar: NavbarConfig,

    /// Footer link sections.
    #[serde(default)]
    pub footer: FooterConfig,

    /// Internal link checking policy.
    #[serde(default)]
    pub links: LinkCheckConfig,

    /// Analytics settings, passed through to the renderer.
    #[serde(default)]
    pub analytics: Option<AnalyticsConfig>,

    /// Declared content sources.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    /// Plugin registration entries.
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Short tagline shown alongside the title.
    #[serde(default)]
    pub tagline: Option<String>,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Favicon path relative to the static root.
    #[serde(default)]
    pub favicon: Option<String>,

    /// Organization name for deployment metadata.
    #[serde(default)]
    pub organization: Option<String>,

    /// Project name for deployment metadata.
    #[serde(default)]
    pub project: Option<String>,
}

/// Locale configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Default locale code.
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// List of supported locales.
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
}

/// Theme configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Named theme tokens (CSS custom properties).
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,

    /// Code highlighting settings.
    #[serde(default)]
    pub code: CodeTheme,
}

/// Code highlighting theme settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeTheme {
    /// Highlight theme for light mode.
    #[serde(default = "default_light_theme")]
    pub light: String,

    /// Highlight theme for dark mode.
    #[serde(default = "default_dark_theme")]
    pub dark: String,

    /// Additional languages to register beyond the defaults.
    #[serde(default)]
    pub extra_languages: Vec<String>,
}

/// Announcement bar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementConfig {
    /// Stable identifier, used by the renderer to remember dismissal.
    pub id: String,

    /// Announcement content (may contain markup).
    pub content: String,

    /// Background color or token reference.
    #[serde(default)]
    pub background: Option<String>,

    /// Text color or token reference.
    #[serde(default)]
    pub text_color: Option<String>,

    /// Whether the bar can be dismissed.
    #[serde(default = "default_true")]
    pub closeable: bool,
}

/// Navbar configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavbarConfig {
    /// Navbar title, falls back to the site title when absent.
    #[serde(default)]
    pub title: Option<String>,

    /// Ordered navbar items.
    #[serde(default)]
    pub items: Vec<NavItem>,
}

/// A single navbar entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    /// Display label.
    pub label: String,

    /// Link target: an internal route ("/docs/intro") or an external URL.
    pub target: String,

    /// Which side of the navbar the item is placed on.
    #[serde(default)]
    pub position: NavPosition,

    /// Explicit ordering among items on the same side. Items without an
    /// explicit order follow declaration order.
    #[serde(default)]
    pub order: Option<i32>,
}

impl NavItem {
    /// Whether the target is an internal route rather than an external URL.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.target.starts_with('/')
    }
}

/// Navbar item placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavPosition {
    /// Left side of the navbar.
    #[default]
    Left,
    /// Right side of the navbar.
    Right,
}

/// Footer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FooterConfig {
    /// Ordered link sections.
    #[serde(default)]
    pub sections: Vec<FooterSection>,

    /// Copyright line.
    #[serde(default)]
    pub copyright: Option<String>,
}

/// A titled group of footer links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterSection {
    /// Section title.
    pub title: String,

    /// Ordered links in this section.
    #[serde(default)]
    pub links: Vec<FooterLink>,
}

/// A single footer link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterLink {
    /// Display label.
    pub label: String,

    /// Link target: an internal route or an external URL.
    pub target: String,
}

impl FooterLink {
    /// Whether the target is an internal route rather than an external URL.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.target.starts_with('/')
    }
}

/// Internal link checking configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkCheckConfig {
    /// Policy for navbar/footer targets that resolve to no route.
    #[serde(default)]
    pub internal: LinkPolicy,
}

/// What to do when an internal link points at a missing route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPolicy {
    /// Abort the build.
    #[default]
    Error,
    /// Log a warning and continue.
    Warn,
    /// Ignore silently.
    Ignore,
}

/// Analytics configuration, declarative only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Tracking identifier.
    pub tracking_id: String,

    /// Whether to anonymize visitor IPs.
    #[serde(default)]
    pub anonymize_ip: bool,
}

/// A declared content source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique source identifier.
    pub id: String,

    /// Filesystem root, relative to the site directory.
    pub root: std::path::PathBuf,

    /// Route prefix for all items discovered under the root.
    pub route_base: String,
}

/// A plugin registration entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Plugin name.
    pub name: String,

    /// Free-form plugin options.
    #[serde(default)]
    pub options: toml::Table,
}

// Default value functions
fn default_locale() -> String {
    "en".to_string()
}

fn default_locales() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_light_theme() -> String {
    "github".to_string()
}

fn default_dark_theme() -> String {
    "dracula".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            locales: default_locales(),
        }
    }
}

impl Default for CodeTheme {
    fn default() -> Self {
        Self {
            light: default_light_theme(),
            dark: default_dark_theme(),
            extra_languages: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `SITEWRIGHT__`-prefixed environment overrides
    /// layered on top of the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("SITEWRIGHT").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. Pure: no filesystem access.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }
        Url::parse(&self.site.base_url).map_err(|e| CoreError::BaseUrl {
            url: self.site.base_url.clone(),
            source: e,
        })?;

        self.validate_locales()?;
        self.validate_navbar()?;
        self.validate_sources()?;

        Ok(())
    }

    fn validate_locales(&self) -> Result<()> {
        if self.i18n.locales.is_empty() {
            return Err(CoreError::config("i18n.locales cannot be empty"));
        }

        for (i, locale) in self.i18n.locales.iter().enumerate() {
            if self.i18n.locales[..i].contains(locale) {
                return Err(CoreError::config(format!(
                    "duplicate locale {locale:?} in i18n.locales"
                )));
            }
        }

        if !self.has_locale(&self.i18n.default_locale) {
            return Err(CoreError::config(format!(
                "default locale {:?} is not in i18n.locales",
                self.i18n.default_locale
            )));
        }

        Ok(())
    }

    fn validate_navbar(&self) -> Result<()> {
        for (i, item) in self.navbar.items.iter().enumerate() {
            let Some(order) = item.order else { continue };

            let collision = self.navbar.items[..i]
                .iter()
                .find(|other| other.position == item.position && other.order == Some(order));

            if let Some(other) = collision {
                return Err(CoreError::config(format!(
                    "navbar items {:?} and {:?} both declare order {order} on the same side",
                    other.label, item.label
                )));
            }
        }

        Ok(())
    }

    fn validate_sources(&self) -> Result<()> {
        for (i, source) in self.sources.iter().enumerate() {
            if source.id.is_empty() {
                return Err(CoreError::config("content source id cannot be empty"));
            }
            if source.route_base.is_empty() {
                return Err(CoreError::config(format!(
                    "content source {:?} has an empty route_base",
                    source.id
                )));
            }
            if self.sources[..i].iter().any(|s| s.id == source.id) {
                return Err(CoreError::config(format!(
                    "duplicate content source id {:?}",
                    source.id
                )));
            }
        }

        Ok(())
    }

    /// Whether a locale is declared.
    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.i18n.locales.iter().any(|l| l == locale)
    }

    /// Get the full URL for a path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

//! Site composition.
//!
//! Merges the validated configuration, resolved content sources, and plugin
//! contributions into a single immutable route table for an external
//! renderer.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    path::PathBuf,
    time::Instant,
};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use sitewright_core::{Config, ContentItem, ContentKind, CoreError, config::LinkPolicy};

use crate::{
    plugin::{Capability, HookError, PluginRegistry},
    source::{ContentSource, SourceError, SourceSet},
};

/// Composition errors.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Configuration validation failed.
    #[error("config error: {0}")]
    Config(#[from] CoreError),

    /// Source registration or resolution failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Two contributions claim the same final route.
    #[error("duplicate route {route:?} contributed by sources {first:?} and {second:?}")]
    DuplicateRoute {
        route: String,
        first: String,
        second: String,
    },

    /// A plugin hook failed; the build is aborted.
    #[error("plugin {plugin:?} failed: {source}")]
    PluginHook {
        plugin: String,
        #[source]
        source: HookError,
    },

    /// An internal navigation target matches no route.
    #[error("internal link {target:?} ({label:?}) does not match any route")]
    BrokenLink { label: String, target: String },
}

impl ComposeError {
    /// Wrap a hook failure with the plugin's name.
    pub fn hook(plugin: impl Into<String>, source: impl Into<HookError>) -> Self {
        Self::PluginHook {
            plugin: plugin.into(),
            source: source.into(),
        }
    }
}

/// Result type for composition.
pub type Result<T> = std::result::Result<T, ComposeError>;

/// A rendered-page descriptor: everything an external renderer needs for
/// one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDescriptor {
    /// Route of this page.
    pub route: String,

    /// Page title.
    pub title: String,

    /// Page description.
    pub description: Option<String>,

    /// Publication date.
    pub date: Option<DateTime<Utc>>,

    /// Declared ordering among siblings.
    pub order: Option<i32>,

    /// Locale code.
    pub locale: String,

    /// Whether this page is a draft.
    pub draft: bool,

    /// Id of the contributing source.
    pub source_id: String,

    /// Path relative to the source root.
    pub path: PathBuf,

    /// Content kind.
    pub kind: ContentKind,

    /// Raw body with frontmatter stripped.
    pub body: String,

    /// Extra stylesheets appended by decorators.
    pub styles: Vec<String>,

    /// Extra scripts appended by decorators.
    pub scripts: Vec<String>,
}

impl PageDescriptor {
    /// Build a descriptor from a resolved content item.
    #[must_use]
    pub fn from_item(item: ContentItem) -> Self {
        let title = item.title();
        Self {
            route: item.route,
            title,
            description: item.frontmatter.description,
            date: item.frontmatter.date,
            order: item.frontmatter.order,
            locale: item.locale,
            draft: item.frontmatter.draft,
            source_id: item.source_id,
            path: item.rel_path,
            kind: item.kind,
            body: item.body,
            styles: Vec::new(),
            scripts: Vec::new(),
        }
    }
}

/// Composition statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComposeStats {
    /// Number of registered content sources, plugin contributions included.
    pub sources: usize,

    /// Number of routes in the final table.
    pub pages: usize,

    /// Number of plugins applied.
    pub plugins: usize,

    /// Composition duration in milliseconds.
    pub duration_ms: u64,
}

/// A composed site: the immutable route table plus the validated
/// configuration, both handed to an external renderer.
#[derive(Debug)]
pub struct Site {
    /// Validated configuration snapshot.
    pub config: Config,

    /// Route table: route string to page descriptor, sorted by route.
    pub routes: BTreeMap<String, PageDescriptor>,

    /// Site stylesheet after all plugin transforms.
    pub styles: String,

    /// Composition statistics.
    pub stats: ComposeStats,
}

/// Site composer. Each composition starts from an immutable configuration
/// snapshot and produces a fresh route table; a failed composition leaves
/// nothing behind.
pub struct Composer {
    config: Config,
    registry: PluginRegistry,
    include_drafts: bool,
    styles: String,
}

impl Composer {
    /// Create a composer for a configuration snapshot.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: PluginRegistry::new(),
            include_drafts: false,
            styles: String::new(),
        }
    }

    /// Attach a plugin registry.
    #[must_use]
    pub fn with_plugins(mut self, registry: PluginRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Include draft pages in the route table.
    #[must_use]
    pub fn with_drafts(mut self, include: bool) -> Self {
        self.include_drafts = include;
        self
    }

    /// Set the input stylesheet fed through style-transforming plugins.
    #[must_use]
    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = styles.into();
        self
    }

    /// Compose the site: validate, resolve sources, apply plugins in
    /// registration order, and assemble the route table.
    ///
    /// Fails fast: any error aborts the composition with no partial output.
    /// Composing twice from the same inputs yields identical route tables.
    pub fn compose(&self) -> Result<Site> {
        let start = Instant::now();

        // 1. Validate the configuration snapshot.
        self.config.validate()?;

        // 2. Register and resolve configured sources. Sources are
        // independent, so resolution runs one task per source; results are
        // merged in declaration order.
        let mut sources = SourceSet::new();
        for sc in &self.config.sources {
            sources.register(ContentSource::new(&sc.id, &sc.root, &sc.route_base))?;
        }

        info!(count = sources.len(), "resolving content sources");
        let i18n = &self.config.i18n;
        let resolved: Vec<_> = sources
            .as_slice()
            .par_iter()
            .map(|source| source.resolve(i18n))
            .collect();

        let mut pages = Vec::new();
        for items in resolved {
            self.push_pages(&mut pages, items?);
        }

        // 3. Apply plugins in registration order. Each plugin observes the
        // cumulative context left by its predecessors.
        let mut styles = self.styles.clone();
        for plugin in self.registry.iter() {
            let name = plugin.name().to_string();
            let caps = plugin.capabilities();

            if caps.contains(&Capability::ContentSource)
                && let Some(source) = plugin.content_source()
            {
                debug!(plugin = %name, source = %source.id, "plugin contributed a content source");
                let items = sources
                    .register(source)
                    .and_then(|source| source.resolve(i18n))
                    .map_err(|e| ComposeError::hook(&name, e))?;
                self.push_pages(&mut pages, items);
            }

            if caps.contains(&Capability::StyleTransform) {
                debug!(plugin = %name, "applying style transform");
                styles = plugin
                    .transform_styles(&styles)
                    .map_err(|e| ComposeError::hook(&name, e))?;
            }

            if caps.contains(&Capability::PageDecoration) {
                debug!(plugin = %name, pages = pages.len(), "decorating pages");
                for page in &mut pages {
                    let route = page.route.clone();
                    plugin
                        .decorate_page(&route, page)
                        .map_err(|e| ComposeError::hook(&name, e))?;
                }
            }
        }

        // 4. Assemble the route table with a global uniqueness check.
        let mut routes: BTreeMap<String, PageDescriptor> = BTreeMap::new();
        for page in pages {
            match routes.entry(page.route.clone()) {
                Entry::Occupied(existing) => {
                    return Err(ComposeError::DuplicateRoute {
                        route: page.route,
                        first: existing.get().source_id.clone(),
                        second: page.source_id,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(page);
                }
            }
        }

        // 5. Enforce the internal link policy against the final table.
        self.check_internal_links(&routes)?;

        let stats = ComposeStats {
            sources: sources.len(),
            pages: routes.len(),
            plugins: self.registry.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            sources = stats.sources,
            pages = stats.pages,
            plugins = stats.plugins,
            duration_ms = stats.duration_ms,
            "composition complete"
        );

        Ok(Site {
            config: self.config.clone(),
            routes,
            styles,
            stats,
        })
    }

    /// Convert items to page descriptors, dropping drafts unless included.
    fn push_pages(&self, pages: &mut Vec<PageDescriptor>, items: Vec<ContentItem>) {
        for item in items {
            if item.frontmatter.draft && !self.include_drafts {
                debug!(route = %item.route, "skipping draft");
                continue;
            }
            pages.push(PageDescriptor::from_item(item));
        }
    }

    /// Check navbar and footer internal targets against the route table.
    fn check_internal_links(&self, routes: &BTreeMap<String, PageDescriptor>) -> Result<()> {
        if self.config.links.internal == LinkPolicy::Ignore {
            return Ok(());
        }

        let nav_links = self
            .config
            .navbar
            .items
            .iter()
            .map(|item| (item.label.as_str(), item.target.as_str()));
        let footer_links = self
            .config
            .footer
            .sections
            .iter()
            .flat_map(|s| s.links.iter())
            .map(|link| (link.label.as_str(), link.target.as_str()));

        for (label, target) in nav_links.chain(footer_links) {
            if !target.starts_with('/') {
                continue;
            }

            let normalized = if target.len() > 1 {
                target.trim_end_matches('/')
            } else {
                target
            };

            if routes.contains_key(normalized) {
                continue;
            }

            match self.config.links.internal {
                LinkPolicy::Error => {
                    return Err(ComposeError::BrokenLink {
                        label: label.to_string(),
                        target: target.to_string(),
                    });
                }
                LinkPolicy::Warn => {
                    warn!(label, target, "internal link does not match any route");
                }
                LinkPolicy::Ignore => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use sitewright_core::Frontmatter;

    use super::*;

    fn test_config(dir: &std::path::Path) -> Config {
        let toml = format!(
            r#"
[site]
title = "Test Site"
base_url = "https://example.com"

[links]
internal = "ignore"

[[sources]]
id = "docs"
root = "{}"
route_base = "/docs"
"#,
            dir.display()
        );
        let config: Config = toml::from_str(&toml).expect("parse config");
        config
    }

    #[test]
    fn test_page_descriptor_from_item() {
        let item = ContentItem {
            source_id: "docs".to_string(),
            rel_path: PathBuf::from("intro.md"),
            route: "/docs/intro".to_string(),
            locale: "en".to_string(),
            kind: ContentKind::Markdown,
            frontmatter: Frontmatter {
                title: Some("Introduction".to_string()),
                description: Some("Start here".to_string()),
                order: Some(1),
                ..Default::default()
            },
            body: "Hello".to_string(),
        };

        let page = PageDescriptor::from_item(item);

        assert_eq!(page.route, "/docs/intro");
        assert_eq!(page.title, "Introduction");
        assert_eq!(page.description.as_deref(), Some("Start here"));
        assert_eq!(page.order, Some(1));
        assert_eq!(page.source_id, "docs");
        assert!(page.styles.is_empty());
    }

    #[test]
    fn test_compose_simple_site() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("intro.md"), "---\ntitle: Intro\n---\nHello").expect("write");

        let site = Composer::new(test_config(dir.path()))
            .compose()
            .expect("compose");

        assert_eq!(site.stats.pages, 1);
        assert!(site.routes.contains_key("/docs/intro"));
    }

    #[test]
    fn test_compose_duplicate_route_names_both_sources() {
        let dir = tempfile::tempdir().expect("create temp dir");
        // Two files forced onto the same route via slug override
        fs::write(dir.path().join("a.md"), "---\nslug: same\n---\nA").expect("write");
        fs::write(dir.path().join("b.md"), "---\nslug: same\n---\nB").expect("write");

        let err = Composer::new(test_config(dir.path()))
            .compose()
            .unwrap_err();

        match err {
            ComposeError::DuplicateRoute {
                route,
                first,
                second,
            } => {
                assert_eq!(route, "/docs/same");
                assert_eq!(first, "docs");
                assert_eq!(second, "docs");
            }
            other => panic!("expected DuplicateRoute, got {other}"),
        }
    }

    #[test]
    fn test_compose_drafts_excluded_by_default() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("wip.md"), "---\ndraft: true\n---\nWip").expect("write");
        fs::write(dir.path().join("done.md"), "Done").expect("write");

        let config = test_config(dir.path());

        let site = Composer::new(config.clone()).compose().expect("compose");
        assert_eq!(site.stats.pages, 1);
        assert!(!site.routes.contains_key("/docs/wip"));

        let site = Composer::new(config)
            .with_drafts(true)
            .compose()
            .expect("compose with drafts");
        assert_eq!(site.stats.pages, 2);
    }

    #[test]
    fn test_compose_invalid_config_fails_first() {
        let config: Config = toml::from_str(
            r#"
[site]
title = ""
base_url = "https://example.com"
"#,
        )
        .expect("parse config");

        let err = Composer::new(config).compose().unwrap_err();
        assert!(matches!(err, ComposeError::Config(_)));
    }
}

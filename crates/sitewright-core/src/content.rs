//! Content item types and route derivation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{config::I18nConfig, frontmatter::Frontmatter};

/// Kind of content file, determined by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Markdown content (.md files).
    Markdown,
    /// MDX content (.mdx files).
    Mdx,
}

impl ContentKind {
    /// Determine content kind from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "mdx" => Some(Self::Mdx),
            _ => None,
        }
    }

    /// Get the file extension for this content kind.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Mdx => "mdx",
        }
    }
}

/// Parsed content path with locale and slug extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    /// Path relative to the source root.
    pub path: PathBuf,

    /// Locale code for this content (always set, defaults to the site default).
    pub locale: String,

    /// Whether this is the default-locale version.
    pub is_default_locale: bool,

    /// Route slug derived from the path, without route base or locale prefix.
    /// Empty for an index file at the source root.
    pub slug: String,

    /// Content kind based on extension.
    pub kind: ContentKind,
}

impl SourcePath {
    /// Parse a source-relative path to extract locale and slug.
    ///
    /// Supports patterns like:
    /// - `intro.md` → locale: default, slug: "intro"
    /// - `intro.fr.md` → locale: "fr", slug: "intro" (when "fr" is declared)
    /// - `guide/index.md` → locale: default, slug: "guide"
    /// - `index.md` → locale: default, slug: ""
    ///
    /// A filename suffix is only treated as a locale when it appears in the
    /// declared locale set; otherwise it stays part of the name.
    pub fn from_path(path: &Path, i18n: &I18nConfig) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        let kind = ContentKind::from_extension(extension)?;

        let stem = path.file_stem()?.to_str()?;

        let (base_stem, detected_locale) = match stem.rfind('.') {
            Some(dot_pos) if i18n.locales.iter().any(|l| l == &stem[dot_pos + 1..]) => {
                (&stem[..dot_pos], Some(stem[dot_pos + 1..].to_string()))
            }
            _ => (stem, None),
        };

        let locale = detected_locale.unwrap_or_else(|| i18n.default_locale.clone());
        let is_default_locale = locale == i18n.default_locale;

        let parent = path.parent().unwrap_or(Path::new(""));
        let slug = if base_stem == "index" {
            parent.to_string_lossy().to_string()
        } else if parent.as_os_str().is_empty() {
            base_stem.to_string()
        } else {
            format!("{}/{}", parent.display(), base_stem)
        };
        let slug = slug.trim_matches('/').to_string();

        Some(Self {
            path: path.to_path_buf(),
            locale,
            is_default_locale,
            slug,
            kind,
        })
    }

    /// Derive the route for this content under a route base.
    ///
    /// Non-default locales get a leading locale segment; an explicit slug
    /// override replaces the path-derived slug.
    #[must_use]
    pub fn route(&self, route_base: &str, slug_override: Option<&str>) -> String {
        let tail = slug_override
            .map(|s| s.trim_matches('/'))
            .unwrap_or(&self.slug);
        let route = join_route(route_base, tail);

        if self.is_default_locale {
            route
        } else if route == "/" {
            format!("/{}", self.locale)
        } else {
            format!("/{}{route}", self.locale)
        }
    }
}

/// A single discovered content item, ready for composition.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    /// Id of the source that contributed this item.
    pub source_id: String,

    /// Path relative to the source root.
    pub rel_path: PathBuf,

    /// Derived route.
    pub route: String,

    /// Locale code.
    pub locale: String,

    /// Content kind.
    pub kind: ContentKind,

    /// Parsed frontmatter.
    pub frontmatter: Frontmatter,

    /// Raw content with frontmatter stripped.
    pub body: String,
}

impl ContentItem {
    /// Page title: the frontmatter title, or a humanized form of the last
    /// route segment.
    #[must_use]
    pub fn title(&self) -> String {
        if let Some(title) = &self.frontmatter.title {
            return title.clone();
        }

        match self.route.rsplit('/').find(|s| !s.is_empty()) {
            Some(segment) => humanize(segment),
            None => "Home".to_string(),
        }
    }

    /// Sort key: declared order first, then relative path.
    #[must_use]
    pub fn sort_key(&self) -> (i32, &Path) {
        (
            self.frontmatter.order.unwrap_or(i32::MAX),
            self.rel_path.as_path(),
        )
    }
}

/// Join a route base and a slug into a normalized route.
fn join_route(base: &str, tail: &str) -> String {
    let base = base.trim_end_matches('/');
    let tail = tail.trim_matches('/');

    match (base.is_empty(), tail.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{tail}"),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{tail}"),
    }
}

/// Turn a file stem like "getting-started" into "Getting Started".
fn humanize(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! Content source registration and discovery.
//!
//! A content source is a named directory contributing pages under a route
//! prefix. Registration enforces pairwise non-overlapping route bases;
//! discovery walks the root and turns files into content items.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

use sitewright_core::{
    ContentItem, ContentKind, SourcePath, config::I18nConfig, frontmatter::parse_frontmatter,
};

/// Content source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source root directory does not exist.
    #[error("content root {root} of source {id:?} does not exist")]
    NotFound { id: String, root: PathBuf },

    /// Two sources claim overlapping route prefixes.
    #[error(
        "route base {second_base:?} of source {second_id:?} overlaps {first_base:?} of source {first_id:?}"
    )]
    RouteConflict {
        first_id: String,
        first_base: String,
        second_id: String,
        second_base: String,
    },

    /// A source id was registered twice.
    #[error("duplicate content source id {0:?}")]
    DuplicateId(String),

    /// Frontmatter or content parsing failed.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A discovered file path could not be interpreted.
    #[error("invalid content path: {0}")]
    InvalidPath(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// A named, path-rooted collection of content items under a route prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSource {
    /// Unique source identifier.
    pub id: String,

    /// Filesystem root to discover content under.
    pub root: PathBuf,

    /// Normalized route prefix for all items of this source.
    pub route_base: String,
}

impl ContentSource {
    /// Create a new content source with a normalized route base.
    #[must_use]
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>, route_base: &str) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
            route_base: normalize_base(route_base),
        }
    }

    /// Discover all content items under the source root.
    ///
    /// The walk is deterministic and restartable: calling `resolve` again on
    /// unchanged inputs yields the same items in the same order (declared
    /// order first, then relative path).
    pub fn resolve(&self, i18n: &I18nConfig) -> Result<Vec<ContentItem>> {
        if !self.root.is_dir() {
            return Err(SourceError::NotFound {
                id: self.id.clone(),
                root: self.root.clone(),
            });
        }

        let mut files = Vec::new();
        walk_dir(&self.root, &mut files)?;

        let mut items = Vec::with_capacity(files.len());
        for path in files {
            items.push(self.load_item(&path, i18n)?);
        }

        items.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        info!(
            source = %self.id,
            root = %self.root.display(),
            items = items.len(),
            "resolved content source"
        );

        Ok(items)
    }

    /// Load a single content file into an item.
    fn load_item(&self, path: &Path, i18n: &I18nConfig) -> Result<ContentItem> {
        debug!(path = %path.display(), "loading content file");

        let content = fs::read_to_string(path)?;
        let rel_path = path.strip_prefix(&self.root).unwrap_or(path);

        let source_path = SourcePath::from_path(rel_path, i18n)
            .ok_or_else(|| SourceError::InvalidPath(path.to_path_buf()))?;

        let (frontmatter, body) =
            parse_frontmatter(&content, rel_path).map_err(|e| SourceError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let route = source_path.route(&self.route_base, frontmatter.slug.as_deref());

        Ok(ContentItem {
            source_id: self.id.clone(),
            rel_path: rel_path.to_path_buf(),
            route,
            locale: source_path.locale,
            kind: source_path.kind,
            frontmatter,
            body,
        })
    }
}

/// An ordered set of content sources with non-overlapping route bases.
#[derive(Debug, Default)]
pub struct SourceSet {
    sources: Vec<ContentSource>,
}

impl SourceSet {
    /// Create an empty source set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source, rejecting duplicate ids and overlapping route bases.
    pub fn register(&mut self, source: ContentSource) -> Result<&ContentSource> {
        if self.sources.iter().any(|s| s.id == source.id) {
            return Err(SourceError::DuplicateId(source.id));
        }

        if let Some(existing) = self
            .sources
            .iter()
            .find(|s| bases_overlap(&s.route_base, &source.route_base))
        {
            return Err(SourceError::RouteConflict {
                first_id: existing.id.clone(),
                first_base: existing.route_base.clone(),
                second_id: source.id,
                second_base: source.route_base,
            });
        }

        self.sources.push(source);
        Ok(self.sources.last().expect("just pushed"))
    }

    /// Registered sources in registration order.
    #[must_use]
    pub fn as_slice(&self) -> &[ContentSource] {
        &self.sources
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Normalize a route base: leading slash, no trailing slash, "/" for the root.
#[must_use]
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Whether two normalized route bases overlap: equal, or one is a
/// segment-wise prefix of the other. The root base overlaps everything.
#[must_use]
pub fn bases_overlap(a: &str, b: &str) -> bool {
    if a == "/" || b == "/" {
        return true;
    }
    a == b || a.starts_with(&format!("{b}/")) || b.starts_with(&format!("{a}/"))
}

/// Recursively collect content files, skipping hidden directories.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            if path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            {
                continue;
            }
            walk_dir(&path, files)?;
        } else if path.is_file()
            && let Some(ext) = path.extension()
            && ContentKind::from_extension(&ext.to_string_lossy()).is_some()
        {
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn i18n() -> I18nConfig {
        I18nConfig {
            default_locale: "en".to_string(),
            locales: vec!["en".to_string(), "fr".to_string()],
        }
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("/docs"), "/docs");
        assert_eq!(normalize_base("docs"), "/docs");
        assert_eq!(normalize_base("/docs/"), "/docs");
        assert_eq!(normalize_base("tutorials"), "/tutorials");
        assert_eq!(normalize_base("/"), "/");
        assert_eq!(normalize_base(""), "/");
    }

    #[test]
    fn test_bases_overlap() {
        assert!(bases_overlap("/docs", "/docs"));
        assert!(bases_overlap("/docs", "/docs/api"));
        assert!(bases_overlap("/docs/api", "/docs"));
        assert!(bases_overlap("/", "/docs"));
        assert!(!bases_overlap("/doc", "/docs"));
        assert!(!bases_overlap("/docs", "/tutorials"));
    }

    #[test]
    fn test_register_overlapping_bases() {
        let mut set = SourceSet::new();
        set.register(ContentSource::new("docs", "docs", "/docs"))
            .expect("register docs");

        let err = set
            .register(ContentSource::new("api", "api", "/docs/api"))
            .unwrap_err();

        match err {
            SourceError::RouteConflict {
                first_id,
                second_id,
                ..
            } => {
                assert_eq!(first_id, "docs");
                assert_eq!(second_id, "api");
            }
            other => panic!("expected RouteConflict, got {other}"),
        }
    }

    #[test]
    fn test_register_duplicate_id() {
        let mut set = SourceSet::new();
        set.register(ContentSource::new("docs", "docs", "/docs"))
            .expect("register docs");

        let err = set
            .register(ContentSource::new("docs", "other", "/other"))
            .unwrap_err();
        assert!(matches!(err, SourceError::DuplicateId(id) if id == "docs"));
    }

    #[test]
    fn test_resolve_missing_root() {
        let source = ContentSource::new("docs", "/nonexistent/docs", "/docs");
        let err = source.resolve(&i18n()).unwrap_err();

        assert!(matches!(err, SourceError::NotFound { id, .. } if id == "docs"));
    }

    #[test]
    fn test_resolve_discovers_and_sorts() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(
            dir.path().join("zebra.md"),
            "---\ntitle: Zebra\norder: 1\n---\nBody",
        )
        .expect("write");
        fs::write(dir.path().join("alpha.md"), "---\ntitle: Alpha\n---\nBody").expect("write");
        fs::create_dir(dir.path().join("guide")).expect("mkdir");
        fs::write(dir.path().join("guide/index.md"), "Guide body").expect("write");
        // Non-content files are ignored
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let source = ContentSource::new("docs", dir.path(), "/docs");
        let items = source.resolve(&i18n()).expect("resolve");

        let routes: Vec<_> = items.iter().map(|i| i.route.as_str()).collect();
        // zebra has a declared order, the rest sort by relative path
        assert_eq!(routes, vec!["/docs/zebra", "/docs/alpha", "/docs/guide"]);
    }

    #[test]
    fn test_resolve_is_restartable() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("a.md"), "A").expect("write");
        fs::write(dir.path().join("b.md"), "B").expect("write");

        let source = ContentSource::new("docs", dir.path(), "/docs");
        let first = source.resolve(&i18n()).expect("first resolve");
        let second = source.resolve(&i18n()).expect("second resolve");

        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_skips_hidden_directories() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(dir.path().join(".drafts")).expect("mkdir");
        fs::write(dir.path().join(".drafts/secret.md"), "hidden").expect("write");
        fs::write(dir.path().join("visible.md"), "visible").expect("write");

        let source = ContentSource::new("docs", dir.path(), "/docs");
        let items = source.resolve(&i18n()).expect("resolve");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].route, "/docs/visible");
    }

    #[test]
    fn test_resolve_locale_routes() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("intro.md"), "English").expect("write");
        fs::write(dir.path().join("intro.fr.md"), "French").expect("write");

        let source = ContentSource::new("docs", dir.path(), "/docs");
        let items = source.resolve(&i18n()).expect("resolve");

        let routes: Vec<_> = items.iter().map(|i| i.route.as_str()).collect();
        assert!(routes.contains(&"/docs/intro"));
        assert!(routes.contains(&"/fr/docs/intro"));
    }

    #[test]
    fn test_resolve_bad_frontmatter() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("bad.md"), "---\ntitle: [unclosed\n---\nBody").expect("write");

        let source = ContentSource::new("docs", dir.path(), "/docs");
        let err = source.resolve(&i18n()).unwrap_err();

        assert!(matches!(err, SourceError::Parse { .. }));
    }
}

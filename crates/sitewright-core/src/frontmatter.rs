//! Frontmatter parsing for content files.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Frontmatter metadata for content files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title. Derived from the file name when absent.
    #[serde(default)]
    pub title: Option<String>,

    /// Page description for meta tags and summaries.
    #[serde(default)]
    pub description: Option<String>,

    /// Publication date.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Declared position among siblings. Items without an order sort after
    /// ordered ones, by file name.
    #[serde(default)]
    pub order: Option<i32>,

    /// Route slug override, replacing the slug derived from the file path.
    #[serde(default)]
    pub slug: Option<String>,

    /// Custom extra fields (for extensibility).
    #[serde(default, flatten)]
    pub extra: std::collections::HashMap<String, serde_yaml::Value>,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();

    let after_first = &content[delimiter.len()..];
    let closing_pos = after_first.find(delimiter)?;

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + delimiter.len()..].trim_start();

    Some((format, frontmatter, body))
}

/// Parse frontmatter from a string, returning the metadata and the body.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        // No frontmatter found, return default with full content
        return Ok((Frontmatter::default(), content.to_string()));
    };

    let frontmatter: Frontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
    };

    Ok((frontmatter, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = "---\ntitle: Hello\n---\n\nBody text";
        let (format, fm, body) = split_frontmatter(content).expect("split");

        assert_eq!(format, FrontmatterFormat::Yaml);
        assert_eq!(fm, "title: Hello");
        assert_eq!(body, "Body text");
    }

    #[test]
    fn test_split_toml_frontmatter() {
        let content = "+++\ntitle = \"Hello\"\n+++\nBody";
        let (format, fm, body) = split_frontmatter(content).expect("split");

        assert_eq!(format, FrontmatterFormat::Toml);
        assert_eq!(fm, "title = \"Hello\"");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(split_frontmatter("Just a body").is_none());
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = "---\ntitle: Getting Started\norder: 2\ndraft: true\n---\nBody";
        let (fm, body) = parse_frontmatter(content, Path::new("intro.md")).expect("parse");

        assert_eq!(fm.title.as_deref(), Some("Getting Started"));
        assert_eq!(fm.order, Some(2));
        assert!(fm.draft);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = "+++\ntitle = \"Guide\"\nslug = \"the-guide\"\n+++\nBody";
        let (fm, body) = parse_frontmatter(content, Path::new("guide.md")).expect("parse");

        assert_eq!(fm.title.as_deref(), Some("Guide"));
        assert_eq!(fm.slug.as_deref(), Some("the-guide"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_date() {
        let content = "---\ntitle: Post\ndate: 2026-01-14T00:00:00Z\n---\nBody";
        let (fm, _) = parse_frontmatter(content, Path::new("post.md")).expect("parse");

        assert!(fm.date.is_some());
    }

    #[test]
    fn test_parse_missing_frontmatter_returns_default() {
        let content = "Plain body, no metadata";
        let (fm, body) = parse_frontmatter(content, Path::new("page.md")).expect("parse");

        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        let result = parse_frontmatter(content, Path::new("bad.md"));

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("bad.md"));
    }

    #[test]
    fn test_extra_fields_preserved() {
        let content = "---\ntitle: Page\nsidebar_label: Short\n---\nBody";
        let (fm, _) = parse_frontmatter(content, Path::new("page.md")).expect("parse");

        assert!(fm.extra.contains_key("sidebar_label"));
    }
}

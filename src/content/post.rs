//! Post model

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Short summary shown in listings and meta tags
    pub description: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file path, relative to the content directory
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path, always `/<dir>/`
    pub slug: String,

    /// Files living next to the post (images and the like)
    pub assets: Vec<PathBuf>,

    /// Drafts are skipped unless `render_drafts` is set
    pub draft: bool,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, source: String) -> Self {
        let slug = slug_from_source(&source);
        Self {
            title,
            date,
            description: String::new(),
            content: String::new(),
            full_source: PathBuf::from(&source),
            source,
            slug,
            assets: Vec::new(),
            draft: false,
            extra: IndexMap::new(),
        }
    }

    /// The older neighbour in a newest-first list
    pub fn previous<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.source == self.source)?;
        posts.get(pos + 1)
    }

    /// The newer neighbour in a newest-first list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.source == self.source)?;
        pos.checked_sub(1).map(|i| &posts[i])
    }
}

/// Derive the URL path of a post from its source path
///
/// `hello-world/index.md` and `hello-world.md` both map to `/hello-world/`.
pub fn slug_from_source(source: &str) -> String {
    let source = source.replace('\\', "/");
    let without_ext = source
        .trim_end_matches(".md")
        .trim_end_matches(".markdown");
    let dir = if without_ext == "index" {
        ""
    } else {
        without_ext.strip_suffix("/index").unwrap_or(without_ext)
    };
    let dir = dir.trim_matches('/');

    if dir.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", dir)
    }
}

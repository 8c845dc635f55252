//! penlog: a small static site generator for a personal technical blog
//!
//! Posts live one per directory under the content directory, as markdown
//! with YAML front-matter and co-located images. The site metadata and the
//! author avatar form a tiny data graph that components such as the author
//! bio are rendered from.

pub mod commands;
pub mod components;
pub mod config;
pub mod content;
pub mod generator;
pub mod graph;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "site.yml";

/// A blog rooted at a directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding one sub-directory per post
    pub content_dir: PathBuf,
    /// Site-wide images such as the avatar
    pub assets_dir: PathBuf,
    /// Files copied verbatim into the output
    pub static_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self {
            content_dir: base_dir.join(&config.content_dir),
            assets_dir: base_dir.join(&config.assets_dir),
            static_dir: base_dir.join(&config.static_dir),
            public_dir: base_dir.join(&config.public_dir),
            config,
            base_dir,
        })
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Check every post's front-matter
    pub fn check(&self) -> Result<content::IntegrityReport> {
        content::check_posts(&self.content_dir)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_post(self, title, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_new_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.content_dir, dir.path().join("content/blog"));
        assert_eq!(blog.public_dir, dir.path().join("public"));
    }

    #[test]
    fn test_new_with_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "content_dir: posts\npublic_dir: dist\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.content_dir, dir.path().join("posts"));
        assert_eq!(blog.public_dir, dir.path().join("dist"));
    }

    #[test]
    fn test_new_with_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "siteMetadata: [oops\n").unwrap();
        assert!(Blog::new(dir.path()).is_err());
    }
}

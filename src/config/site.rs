//! Site configuration (site.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Metadata exposed to templates and components
    #[serde(rename = "siteMetadata")]
    pub site_metadata: SiteMetadata,

    // Directory
    pub content_dir: String,
    pub assets_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    // Avatar
    pub avatar: String,
    pub avatar_size: u32,

    // Writing
    pub language: String,
    pub date_format: String,
    pub highlight_theme: String,
    pub render_drafts: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_metadata: SiteMetadata::default(),

            content_dir: "content/blog".to_string(),
            assets_dir: "content/assets".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            avatar: "profile-pic.jpg".to_string(),
            avatar_size: 50,

            language: "en".to_string(),
            date_format: "MMMM DD, YYYY".to_string(),
            highlight_theme: "base16-ocean.dark".to_string(),
            render_drafts: false,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid site configuration in {:?}", path))?;
        Ok(config)
    }
}

/// Site-wide metadata, a read-only singleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteMetadata {
    pub title: String,
    pub author: String,
    pub author_first_name: String,
    pub description: String,
    pub site_url: String,
    pub social: Social,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            author: "John Doe".to_string(),
            author_first_name: "John".to_string(),
            description: String::new(),
            site_url: "http://localhost:8000".to_string(),
            social: Social::default(),
        }
    }
}

/// Social handles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Social {
    pub twitter: String,
}

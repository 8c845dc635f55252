//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Create `<content_dir>/<slug>/index.md` with a front-matter scaffold
///
/// `path` overrides the directory name derived from the title.
pub fn create_post(blog: &Blog, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let dir_name = match path {
        Some(p) => p.trim_matches('/').to_string(),
        None => slug::slugify(title),
    };
    if dir_name.is_empty() {
        bail!("Cannot derive a post directory from title {:?}", title);
    }

    let post_dir = blog.content_dir.join(&dir_name);
    let file_path = post_dir.join("index.md");
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: {}\ndate: \"{}\"\ndescription: \"\"\n---\n",
        yaml_string(title),
        now.to_rfc3339()
    );

    fs::create_dir_all(&post_dir)?;
    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a scalar for YAML
fn yaml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

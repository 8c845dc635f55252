//! Content loader - loads posts from the content directory

use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::validate::{is_markdown_file, post_files, validate};
use super::{FrontMatter, MarkdownRenderer, Post};
use crate::Blog;

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        let renderer = MarkdownRenderer::with_theme(&blog.config.highlight_theme);
        Self { blog, renderer }
    }

    /// Load all posts, newest first
    ///
    /// Fails if any post has malformed or incomplete front-matter; every
    /// offending file is named in the error.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = &self.blog.content_dir;
        if !posts_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", posts_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        let mut failures = Vec::new();

        for path in post_files(posts_dir) {
            match self.load_post(&path) {
                Ok(post) => {
                    if post.draft && !self.blog.config.render_drafts {
                        tracing::info!("Skipping draft {:?}", path);
                        continue;
                    }
                    posts.push(post);
                }
                Err(e) => failures.push(format!("{}: {:#}", path.display(), e)),
            }
        }

        if !failures.is_empty() {
            bail!(
                "{} post(s) failed to load:\n  {}",
                failures.len(),
                failures.join("\n  ")
            );
        }

        check_slugs(&posts)?;

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.source.cmp(&b.source)));

        Ok(posts)
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let issues = validate(&fm);
        if !issues.is_empty() {
            let issues: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
            bail!("{}", issues.join("; "));
        }

        let date = fm
            .parse_date()
            .ok_or_else(|| anyhow!("`date` is not a valid timestamp"))?;

        let source = path
            .strip_prefix(&self.blog.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let mut post = Post::new(fm.title.unwrap_or_default(), date, source);
        let content_html = self.renderer.render_post(body, &post.slug)?;

        post.description = fm.description.unwrap_or_default();
        post.content = content_html;
        post.full_source = path.to_path_buf();
        post.assets = colocated_assets(path);
        post.draft = fm.draft;
        post.extra = fm.extra;

        Ok(post)
    }
}

/// Every post needs its own output page
///
/// Two sources mapping to one slug would overwrite each other, and the root
/// slug would replace the home page.
fn check_slugs(posts: &[Post]) -> Result<()> {
    let mut by_slug: IndexMap<&str, Vec<&Path>> = IndexMap::new();
    for post in posts {
        by_slug
            .entry(post.slug.as_str())
            .or_default()
            .push(&post.full_source);
    }

    let mut problems = Vec::new();
    for (slug, sources) in &by_slug {
        let files: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
        if *slug == "/" {
            problems.push(format!(
                "{} would replace the home page; move it into its own directory",
                files.join(", ")
            ));
        } else if sources.len() > 1 {
            problems.push(format!("{} all map to {}", files.join(", "), slug));
        }
    }

    if !problems.is_empty() {
        bail!("conflicting post URLs:\n  {}", problems.join("\n  "));
    }
    Ok(())
}

/// Non-markdown files that live in a post's own directory
///
/// Only `index.md` posts own their directory; nested post directories are
/// left to their own posts.
fn colocated_assets(post_path: &Path) -> Vec<PathBuf> {
    let is_index = post_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s == "index")
        .unwrap_or(false);
    let Some(dir) = post_path.parent().filter(|_| is_index) else {
        return Vec::new();
    };

    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !(e.file_type().is_dir() && owns_post(e.path())))
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && !is_markdown_file(p))
        .collect()
}

fn owns_post(dir: &Path) -> bool {
    dir.join("index.md").exists() || dir.join("index.markdown").exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn blog_with_posts() -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("content/blog");
        write(
            &posts.join("hello-world/index.md"),
            "---\ntitle: Hello World\ndate: \"2015-05-01T22:12:03.284Z\"\ndescription: Hello World\n---\n\nThis is my first post.\n\n![Chinese Salty Egg](./salty_egg.jpg)\n",
        );
        write(&posts.join("hello-world/salty_egg.jpg"), "jpeg");
        write(
            &posts.join("my-second-post/index.md"),
            "---\ntitle: My Second Post!\ndate: \"2015-05-06T23:46:37.121Z\"\ndescription: Wow\n---\n\nWow! I love blogging so much already.\n",
        );
        write(
            &posts.join("new-beginnings/index.md"),
            "---\ntitle: New Beginnings\ndate: \"2015-05-28T22:40:32.169Z\"\ndescription: This is a custom description.\n---\n\nFar far away.\n",
        );
        write(
            &posts.join("unfinished/index.md"),
            "---\ntitle: Unfinished\ndate: 2016-01-01\ndescription: Soon\ndraft: true\n---\n\nTBD\n",
        );
        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    #[test]
    fn test_load_posts_newest_first() {
        let (_dir, blog) = blog_with_posts();
        let posts = ContentLoader::new(&blog).load_posts().unwrap();

        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["/new-beginnings/", "/my-second-post/", "/hello-world/"]);
    }

    #[test]
    fn test_post_fields() {
        let (_dir, blog) = blog_with_posts();
        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        let hello = posts.iter().find(|p| p.slug == "/hello-world/").unwrap();

        assert_eq!(hello.title, "Hello World");
        assert_eq!(hello.description, "Hello World");
        assert!(hello.content.contains(r#"src="/hello-world/salty_egg.jpg""#));
        assert_eq!(hello.assets.len(), 1);
        assert!(hello.assets[0].ends_with("salty_egg.jpg"));
    }

    #[test]
    fn test_drafts_rendered_when_enabled() {
        let (_dir, mut blog) = blog_with_posts();
        blog.config.render_drafts = true;
        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        assert!(posts.iter().any(|p| p.slug == "/unfinished/" && p.draft));
    }

    #[test]
    fn test_invalid_post_fails_the_load() {
        let (dir, blog) = blog_with_posts();
        write(
            &dir.path().join("content/blog/broken/index.md"),
            "---\ntitle: Broken\ndate: someday\n---\nbody\n",
        );
        let err = ContentLoader::new(&blog).load_posts().unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("broken"));
        assert!(message.contains("not a valid timestamp"));
        assert!(message.contains("`description` is missing"));
    }

    #[test]
    fn test_nested_post_assets_not_claimed_by_parent() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("content/blog");
        let fm = "---\ntitle: T\ndate: 2020-01-01\ndescription: D\n---\n";
        write(&posts.join("series/index.md"), fm);
        write(&posts.join("series/cover.png"), "png");
        write(&posts.join("series/part-one/index.md"), fm);
        write(&posts.join("series/part-one/figure.png"), "png");

        let blog = Blog::new(dir.path()).unwrap();
        let loader = ContentLoader::new(&blog);
        let parent = loader.load_post(&posts.join("series/index.md")).unwrap();
        assert_eq!(parent.assets.len(), 1);
        assert!(parent.assets[0].ends_with("cover.png"));

        let child = loader
            .load_post(&posts.join("series/part-one/index.md"))
            .unwrap();
        assert_eq!(child.slug, "/series/part-one/");
        assert!(child.assets[0].ends_with("figure.png"));
    }

    #[test]
    fn test_duplicate_slugs_fail_the_load() {
        let (dir, blog) = blog_with_posts();
        write(
            &dir.path().join("content/blog/hello-world.md"),
            "---\ntitle: Loose\ndate: 2021-01-01\ndescription: D\n---\nbody\n",
        );
        let err = ContentLoader::new(&blog).load_posts().unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("hello-world.md"));
        assert!(message.contains("hello-world/index.md"));
        assert!(message.contains("all map to /hello-world/"));
    }

    #[test]
    fn test_root_index_post_fails_the_load() {
        let (dir, blog) = blog_with_posts();
        write(
            &dir.path().join("content/blog/index.md"),
            "---\ntitle: Root\ndate: 2021-01-01\ndescription: D\n---\nbody\n",
        );
        let err = ContentLoader::new(&blog).load_posts().unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("would replace the home page"));
        assert!(message.contains("index.md"));
    }

    #[test]
    fn test_skipped_draft_does_not_conflict() {
        let (dir, blog) = blog_with_posts();
        write(
            &dir.path().join("content/blog/hello-world.md"),
            "---\ntitle: Rewrite\ndate: 2021-01-01\ndescription: D\ndraft: true\n---\nbody\n",
        );
        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        assert_eq!(posts.len(), 3);
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(ContentLoader::new(&blog).load_posts().unwrap().is_empty());
    }
}

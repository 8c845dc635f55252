//! Generate static files

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::path::{Component, Path};
use std::time::{Duration, Instant};

use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::Blog;

/// Quiet period before a burst of file events triggers one rebuild
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Generate the static site
pub fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let loader = ContentLoader::new(blog);
    let posts = loader.load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(blog)?;
    generator.generate(&posts)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Watch for file changes and regenerate
pub fn watch(blog: &Blog) -> Result<()> {
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");
    watch_with(blog, || {})
}

/// Rebuild after each debounced batch of relevant changes
///
/// `on_rebuilt` runs after every successful regeneration.
pub fn watch_with<F>(blog: &Blog, mut on_rebuilt: F) -> Result<()>
where
    F: FnMut(),
{
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(DEBOUNCE, tx)?;

    for dir in [&blog.content_dir, &blog.assets_dir, &blog.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }
    let config_path = blog.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    for result in rx {
        match result {
            Ok(events) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant_change(&e.path))
                    .collect();
                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }

                match reload_and_run(blog) {
                    Ok(()) => {
                        tracing::info!("Regenerated successfully");
                        on_rebuilt();
                    }
                    Err(e) => tracing::error!("Generation failed: {:#}", e),
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Re-read the configuration before generating, so edits to it take effect
pub fn reload_and_run(blog: &Blog) -> Result<()> {
    let blog = Blog::new(&blog.base_dir)?;
    run(&blog)
}

/// Editor droppings and VCS metadata never trigger a rebuild
fn is_relevant_change(path: &Path) -> bool {
    let in_vcs_dir = path.components().any(|c| match c {
        Component::Normal(name) => matches!(name.to_str(), Some(".git" | ".hg" | ".svn")),
        _ => false,
    });
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    !(in_vcs_dir
        || file_name == ".DS_Store"
        || file_name.ends_with('~')
        || file_name.ends_with(".swp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relevant_change() {
        assert!(is_relevant_change(Path::new("content/blog/a/index.md")));
        assert!(!is_relevant_change(Path::new("content/blog/a/.index.md.swp")));
        assert!(!is_relevant_change(Path::new("content/blog/a/index.md~")));
        assert!(!is_relevant_change(Path::new(".git/HEAD")));
        assert!(!is_relevant_change(Path::new("/site/.git/refs/heads/main")));
        assert!(!is_relevant_change(Path::new("static/.DS_Store")));
    }

    #[test]
    fn test_git_lookalike_names_are_relevant() {
        assert!(is_relevant_change(Path::new(
            "content/blog/using-.gitignore/index.md"
        )));
        assert!(is_relevant_change(Path::new(".github/workflows/deploy.yml")));
        assert!(is_relevant_change(Path::new("static/.gitkeep")));
    }
}

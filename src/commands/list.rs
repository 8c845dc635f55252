//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::Blog;

/// List posts, newest first
pub fn run(blog: &Blog) -> Result<()> {
    let loader = ContentLoader::new(blog);
    let posts = loader.load_posts()?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        let draft = if post.draft { " (draft)" } else { "" };
        println!(
            "  {} - {}{} [{}]",
            post.date.format("%Y-%m-%d"),
            post.title,
            draft,
            post.slug
        );
    }

    Ok(())
}

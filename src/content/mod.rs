//! Content module - handles posts, front-matter and markdown

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod validate;

pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{slug_from_source, Post};
pub use validate::{check_posts, FrontMatterIssue, IntegrityReport};

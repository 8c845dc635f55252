//! Site data graph
//!
//! Holds the site metadata and processed image nodes, and answers the typed
//! queries that components consume.

mod image;
mod query;

pub use image::{FixedImage, ImageError, ImageNode, ImageProcessor};
pub use query::{AvatarNode, BioMetadata, BioQuery, ImageSharp, SiteNode};

use indexmap::IndexMap;
use thiserror::Error;

use crate::config::SiteMetadata;
use crate::Blog;

/// Name of the author avatar node
pub const AVATAR: &str = "avatar";

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no `{0}` node in the site graph")]
    MissingNode(String),
    #[error("site metadata field `{0}` is empty")]
    MissingField(&'static str),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Metadata and image nodes for one build
#[derive(Debug, Clone)]
pub struct SiteGraph {
    pub site_metadata: SiteMetadata,
    images: IndexMap<String, ImageNode>,
}

impl SiteGraph {
    /// A graph with metadata only
    pub fn new(site_metadata: SiteMetadata) -> Self {
        Self {
            site_metadata,
            images: IndexMap::new(),
        }
    }

    /// Build the graph for a blog: metadata plus the avatar node
    pub fn build(blog: &Blog) -> Result<Self, GraphError> {
        let mut graph = Self::new(blog.config.site_metadata.clone());

        let avatar_path = blog.assets_dir.join(&blog.config.avatar);
        let avatar = ImageProcessor::fixed(&avatar_path, blog.config.avatar_size)?;
        tracing::debug!(
            "Avatar {:?} -> {} ({}x{})",
            avatar.source,
            avatar.fixed.src,
            avatar.fixed.width,
            avatar.fixed.height
        );
        graph.insert_image(AVATAR, avatar);

        Ok(graph)
    }

    pub fn insert_image(&mut self, name: &str, node: ImageNode) {
        self.images.insert(name.to_string(), node);
    }

    pub fn image(&self, name: &str) -> Option<&ImageNode> {
        self.images.get(name)
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageNode> {
        self.images.values()
    }

    /// Answer the Bio query
    pub fn bio_query(&self) -> Result<BioQuery, GraphError> {
        let avatar = self
            .image(AVATAR)
            .ok_or_else(|| GraphError::MissingNode(AVATAR.to_string()))?;

        let meta = &self.site_metadata;
        for (field, value) in [
            ("author", &meta.author),
            ("authorFirstName", &meta.author_first_name),
            ("social.twitter", &meta.social.twitter),
        ] {
            if value.trim().is_empty() {
                return Err(GraphError::MissingField(field));
            }
        }

        Ok(BioQuery {
            avatar: AvatarNode {
                child_image_sharp: ImageSharp {
                    fixed: avatar.fixed.clone(),
                },
            },
            site: SiteNode {
                site_metadata: BioMetadata {
                    author: meta.author.clone(),
                    author_first_name: meta.author_first_name.clone(),
                    social: meta.social.clone(),
                },
            },
        })
    }
}

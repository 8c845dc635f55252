//! Author card shown on the home page and under every post

use anyhow::Result;
use serde::Serialize;
use tera::Context;

use crate::graph::{BioQuery, FixedImage};
use crate::templates::TemplateRenderer;

const TWITTER_BASE: &str = "https://twitter.com/";

/// Values interpolated into the bio template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BioProps {
    pub avatar: FixedImage,
    pub author: String,
    pub first_name: String,
    pub twitter_url: String,
}

/// The Bio component: a direct mapping from the Bio query record to markup
pub struct Bio {
    props: BioProps,
}

impl Bio {
    pub fn new(query: &BioQuery) -> Self {
        let meta = &query.site.site_metadata;
        Self {
            props: BioProps {
                avatar: query.avatar.child_image_sharp.fixed.clone(),
                author: meta.author.clone(),
                first_name: meta.author_first_name.clone(),
                twitter_url: format!("{}{}", TWITTER_BASE, meta.social.twitter),
            },
        }
    }

    pub fn props(&self) -> &BioProps {
        &self.props
    }

    /// Render the component to an HTML fragment
    pub fn render(&self, renderer: &TemplateRenderer) -> Result<String> {
        let mut context = Context::new();
        context.insert("bio", &self.props);
        renderer.render("partials/bio.html", &context)
    }
}

//! Built-in theme templates using Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all theme templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Rendered post bodies and component fragments are already HTML;
        // templates escape text values explicitly.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("404.html", include_str!("theme/404.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("theme/partials/head.html"),
            ),
            ("partials/bio.html", include_str!("theme/partials/bio.html")),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(crate::helpers::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    Ok(tera::Value::String(crate::helpers::truncate(
        &s,
        length,
        Some(&omission),
    )))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub site_url: String,
    pub twitter: String,
    pub lang: String,
}

/// Per-page values for the `<head>` meta tags
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub url: String,
    pub og_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub date: String,
    pub date_xml: String,
    pub slug: String,
    pub description: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub slug: String,
}

//! Generator module - writes the static site using the built-in Tera templates

use anyhow::{Context as _, Result};
use chrono::Datelike;
use std::fs;
use std::path::Path;
use tera::Context;
use walkdir::WalkDir;

use crate::components::Bio;
use crate::content::Post;
use crate::graph::SiteGraph;
use crate::helpers::{
    absolutize_urls, date_rfc2822, date_xml, escape_xml, format_date, full_url_for,
    strip_invalid_xml_chars,
};
use crate::templates::{NavPost, PageMeta, PostData, SiteData, TemplateRenderer};
use crate::Blog;

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    ///
    /// `posts` must be sorted newest first.
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)?;

        let graph = SiteGraph::build(&self.blog)?;
        let bio_html = Bio::new(&graph.bio_query()?).render(&self.renderer)?;

        self.copy_images(&graph)?;
        self.copy_static_files()?;
        self.copy_post_assets(posts)?;

        let site_data = self.build_site_data();

        self.generate_index_page(posts, &site_data, &bio_html)?;
        self.generate_post_pages(posts, &site_data, &bio_html)?;
        self.generate_not_found_page(&site_data)?;
        self.generate_rss_feed(posts)?;

        Ok(())
    }

    /// Build site data for templates
    fn build_site_data(&self) -> SiteData {
        let meta = &self.blog.config.site_metadata;
        SiteData {
            title: meta.title.clone(),
            description: meta.description.clone(),
            author: meta.author.clone(),
            site_url: meta.site_url.clone(),
            twitter: meta.social.twitter.clone(),
            lang: self.blog.config.language.clone(),
        }
    }

    fn post_data(&self, post: &Post) -> PostData {
        PostData {
            title: post.title.clone(),
            date: format_date(&post.date, &self.blog.config.date_format),
            date_xml: date_xml(&post.date),
            slug: post.slug.clone(),
            description: post.description.clone(),
            content: post.content.clone(),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self, site_data: &SiteData, meta: &PageMeta, is_home: bool) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("meta", meta);
        context.insert("is_home", &is_home);
        context.insert("current_year", &chrono::Local::now().year());
        context
    }

    /// Generate the home page listing every post
    fn generate_index_page(&self, posts: &[Post], site_data: &SiteData, bio_html: &str) -> Result<()> {
        let meta = PageMeta {
            title: site_data.title.clone(),
            description: site_data.description.clone(),
            url: full_url_for(&site_data.site_url, "/"),
            og_type: "website".to_string(),
        };

        let post_data: Vec<PostData> = posts.iter().map(|p| self.post_data(p)).collect();

        let mut context = self.create_base_context(site_data, &meta, true);
        context.insert("posts", &post_data);
        context.insert("bio_html", bio_html);

        let html = self.renderer.render("index.html", &context)?;
        self.write_output("index.html", &html)?;
        tracing::info!("Generated index with {} posts", posts.len());

        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[Post], site_data: &SiteData, bio_html: &str) -> Result<()> {
        for post in posts {
            let meta = PageMeta {
                title: post.title.clone(),
                description: post.description.clone(),
                url: full_url_for(&site_data.site_url, &post.slug),
                og_type: "article".to_string(),
            };

            let mut context = self.create_base_context(site_data, &meta, false);
            context.insert("post", &self.post_data(post));
            context.insert("bio_html", bio_html);

            if let Some(previous) = post.previous(posts) {
                context.insert("previous", &nav_post(previous));
            }
            if let Some(next) = post.next(posts) {
                context.insert("next", &nav_post(next));
            }

            let html = self.renderer.render("post.html", &context)?;

            // Strip leading slash from the slug to avoid creating absolute paths
            let output = Path::new(post.slug.trim_start_matches('/')).join("index.html");
            self.write_output(&output, &html)?;
            tracing::debug!("Generated post: {:?}", output);
        }

        Ok(())
    }

    fn generate_not_found_page(&self, site_data: &SiteData) -> Result<()> {
        let meta = PageMeta {
            title: "404: Not Found".to_string(),
            description: site_data.description.clone(),
            url: full_url_for(&site_data.site_url, "/404.html"),
            og_type: "website".to_string(),
        };
        let context = self.create_base_context(site_data, &meta, false);
        let html = self.renderer.render("404.html", &context)?;
        self.write_output("404.html", &html)
    }

    /// Generate RSS 2.0 feed
    fn generate_rss_feed(&self, posts: &[Post]) -> Result<()> {
        let meta = &self.blog.config.site_metadata;
        let site_url = meta.site_url.trim_end_matches('/');

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/" xmlns:atom="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str("  <channel>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&meta.title)));
        feed.push_str(&format!(
            "    <description>{}</description>\n",
            escape_xml(&meta.description)
        ));
        feed.push_str(&format!("    <link>{}</link>\n", escape_xml(site_url)));
        feed.push_str(&format!(
            "    <atom:link href=\"{}/rss.xml\" rel=\"self\" type=\"application/rss+xml\"/>\n",
            escape_xml(site_url)
        ));
        feed.push_str("    <generator>penlog</generator>\n");
        if let Some(latest) = posts.first() {
            feed.push_str(&format!(
                "    <lastBuildDate>{}</lastBuildDate>\n",
                date_rfc2822(&latest.date)
            ));
        }

        for post in posts {
            let url = full_url_for(site_url, &post.slug);
            let content = absolutize_urls(&post.content, site_url);
            let content = strip_invalid_xml_chars(&content).replace("]]>", "]]]]><![CDATA[>");

            feed.push_str("    <item>\n");
            feed.push_str(&format!("      <title>{}</title>\n", escape_xml(&post.title)));
            feed.push_str(&format!(
                "      <description>{}</description>\n",
                escape_xml(&post.description)
            ));
            feed.push_str(&format!("      <link>{}</link>\n", escape_xml(&url)));
            feed.push_str(&format!(
                "      <guid isPermaLink=\"false\">{}</guid>\n",
                escape_xml(&url)
            ));
            feed.push_str(&format!(
                "      <pubDate>{}</pubDate>\n",
                date_rfc2822(&post.date)
            ));
            feed.push_str(&format!(
                "      <content:encoded><![CDATA[{}]]></content:encoded>\n",
                content
            ));
            feed.push_str("    </item>\n");
        }

        feed.push_str("  </channel>\n");
        feed.push_str("</rss>\n");

        self.write_output("rss.xml", &feed)?;
        tracing::info!("Generated rss.xml");

        Ok(())
    }

    /// Copy processed image nodes to their hashed locations
    fn copy_images(&self, graph: &SiteGraph) -> Result<()> {
        for node in graph.images() {
            copy_file(&node.source, &self.blog.public_dir.join(&node.output))?;
        }
        Ok(())
    }

    /// Copy the static directory verbatim
    fn copy_static_files(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(static_dir)?;
                copy_file(path, &self.blog.public_dir.join(relative))?;
            }
        }

        Ok(())
    }

    /// Copy files that live next to each post into the post's output directory
    fn copy_post_assets(&self, posts: &[Post]) -> Result<()> {
        for post in posts {
            let Some(post_dir) = post.full_source.parent() else {
                continue;
            };
            let out_dir = self.blog.public_dir.join(post.slug.trim_start_matches('/'));

            for asset in &post.assets {
                let relative = asset.strip_prefix(post_dir)?;
                copy_file(asset, &out_dir.join(relative))?;
            }
        }
        Ok(())
    }

    fn write_output<P: AsRef<Path>>(&self, relative: P, content: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        Ok(())
    }
}

fn nav_post(post: &Post) -> NavPost {
    NavPost {
        title: post.title.clone(),
        slug: post.slug.clone(),
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
    Ok(())
}

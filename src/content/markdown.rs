//! Markdown rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::{html_escape, resolve_asset_url, rewrite_img_sources};

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

struct CodeBlock {
    lang: Option<String>,
    body: String,
}

struct Heading<'a> {
    level: HeadingLevel,
    id: Option<String>,
    inner: Vec<Event<'a>>,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_theme("base16-ocean.dark")
    }

    /// Create with a specific highlight theme
    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        self.render_inner(markdown, None)
    }

    /// Render a post body, resolving relative image paths against the post URL
    pub fn render_post(&self, markdown: &str, slug: &str) -> Result<String> {
        self.render_inner(markdown, Some(slug))
    }

    fn render_inner(&self, markdown: &str, base: Option<&str>) -> Result<String> {
        // Front-matter is stripped before we get here, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<CodeBlock> = None;
        let mut heading: Option<Heading> = None;

        for event in parser {
            let event = match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|l| l.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(CodeBlock {
                        lang,
                        body: String::new(),
                    });
                    continue;
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code_block.take() {
                        let highlighted = self.highlight_code(&block.body, block.lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                    continue;
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some(block) = code_block.as_mut() {
                        block.body.push_str(&text);
                    }
                    continue;
                }
                Event::Start(Tag::Heading { level, id, .. }) => {
                    heading = Some(Heading {
                        level,
                        id: id.map(|id| id.to_string()),
                        inner: Vec::new(),
                    });
                    continue;
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(h) = heading.take() {
                        let id = h
                            .id
                            .unwrap_or_else(|| slug::slugify(heading_text(&h.inner)));
                        events.push(Event::Html(CowStr::from(format!(
                            "<{} id=\"{}\">",
                            h.level,
                            html_escape(&id)
                        ))));
                        events.extend(h.inner);
                        events.push(Event::Html(CowStr::from(format!("</{}>\n", h.level))));
                    }
                    continue;
                }
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let dest_url = match base {
                        Some(base) => CowStr::from(resolve_asset_url(&dest_url, base)),
                        None => dest_url,
                    };
                    Event::Start(Tag::Image {
                        link_type,
                        dest_url,
                        title,
                        id,
                    })
                }
                Event::Html(raw) => match base {
                    Some(base) => Event::Html(CowStr::from(rewrite_img_sources(&raw, base))),
                    None => Event::Html(raw),
                },
                Event::InlineHtml(raw) => match base {
                    Some(base) => {
                        Event::InlineHtml(CowStr::from(rewrite_img_sources(&raw, base)))
                    }
                    None => Event::InlineHtml(raw),
                },
                other => other,
            };

            match heading.as_mut() {
                Some(h) => h.inner.push(event),
                None => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(highlighted) => format!(
                r#"<div class="highlight language-{}">{}</div>"#,
                html_escape(lang),
                highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain text of a heading, used for its anchor
fn heading_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        if let Event::Text(t) | Event::Code(t) = event {
            text.push_str(t);
        }
    }
    text
}

//! URL helper functions

use lazy_static::lazy_static;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

lazy_static! {
    static ref IMG_SRC: Regex =
        Regex::new(r#"(<img\b[^>]*?\bsrc\s*=\s*)(["'])([^"']*)(["'])"#).unwrap();
    static ref ROOT_RELATIVE: Regex = Regex::new(r#"\b(href|src)=(["'])/([^/])"#).unwrap();
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for("https://example.com/", "/hello/") // -> "https://example.com/hello/"
/// ```
pub fn full_url_for(site_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Whether a URL points next to the current document
pub fn is_relative_url(url: &str) -> bool {
    !(url.is_empty()
        || url.starts_with('/')
        || url.starts_with('#')
        || url.starts_with('?')
        || url.starts_with("data:")
        || url.starts_with("mailto:")
        || url.contains("://"))
}

/// Resolve a relative asset reference against the URL of the page that owns it
///
/// # Examples
/// ```ignore
/// resolve_asset_url("./salty_egg.jpg", "/hello-world/") // -> "/hello-world/salty_egg.jpg"
/// ```
pub fn resolve_asset_url(url: &str, base: &str) -> String {
    if !is_relative_url(url) {
        return url.to_string();
    }

    let mut url = url;
    while let Some(rest) = url.strip_prefix("./") {
        url = rest;
    }

    let base = base.trim_end_matches('/');
    format!("{}/{}", base, url)
}

/// Rewrite relative `src` attributes of `<img>` tags in raw HTML
pub fn rewrite_img_sources(html: &str, base: &str) -> String {
    IMG_SRC
        .replace_all(html, |caps: &Captures| {
            format!(
                "{}{}{}{}",
                &caps[1],
                &caps[2],
                resolve_asset_url(&caps[3], base),
                &caps[4]
            )
        })
        .into_owned()
}

/// Convert root-relative URLs in HTML content to absolute URLs
pub fn absolutize_urls(content: &str, site_url: &str) -> String {
    let base = site_url.trim_end_matches('/');
    ROOT_RELATIVE
        .replace_all(content, |caps: &Captures| {
            format!("{}={}{}/{}", &caps[1], &caps[2], base, &caps[3])
        })
        .into_owned()
}

/// Encode a single URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

//! Front-matter parsing

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub draft: bool,

    /// Additional custom fields, in document order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if !content.starts_with("---") {
            return Ok((FrontMatter::default(), content));
        }

        let rest = content[3..].trim_start_matches([' ', '\t']);
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .ok_or_else(|| anyhow!("Front-matter opening `---` must be on its own line"))?;

        let (yaml_content, remaining) = if let Some(after) = rest.strip_prefix("---") {
            // Empty block
            ("", after)
        } else {
            let end_pos = rest
                .find("\n---")
                .ok_or_else(|| anyhow!("Front-matter block is not terminated by `---`"))?;
            (&rest[..end_pos], &rest[end_pos + 4..])
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm: FrontMatter =
            serde_yaml::from_str(yaml_content).context("Failed to parse YAML front-matter")?;
        Ok((fm, remaining))
    }

    /// Parse the date string into a DateTime
    pub fn parse_date(&self) -> Option<DateTime<Local>> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Parse a date string in the accepted formats
pub(crate) fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&dt).earliest();
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Local.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: "2015-05-01T22:12:03.284Z"
description: Hello World
---

This is my first post on my new fake blog!
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.description.as_deref(), Some("Hello World"));
        assert!(fm.parse_date().is_some());
        assert!(!fm.draft);
        assert!(remaining.starts_with("This is my first post"));
    }

    #[test]
    fn test_unquoted_date_is_a_string() {
        let content = "---\ntitle: T\ndate: 2019-02-28\ndescription: D\n---\nbody\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.date.as_deref(), Some("2019-02-28"));
        assert_eq!(remaining, "body\n");
    }

    #[test]
    fn test_extra_fields_preserved_in_order() {
        let content = "---\ntitle: T\nspoiler: secret\nlang: en\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        let keys: Vec<_> = fm.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["spoiler", "lang"]);
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("# Just a heading\n").unwrap();
        assert!(fm.title.is_none());
        assert_eq!(remaining, "# Just a heading\n");
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("---\n---\nbody").unwrap();
        assert!(fm.title.is_none());
        assert_eq!(remaining, "body");
    }

    #[test]
    fn test_unterminated_frontmatter_is_an_error() {
        let content = "---\ntitle: Never closed\n\nSome body text\n";
        assert!(FrontMatter::parse(content).is_err());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nbody\n";
        assert!(FrontMatter::parse(content).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        for (input, expected) in [
            ("2024-01-15", "2024-01-15 00:00"),
            ("2024-01-15 10:30", "2024-01-15 10:30"),
            ("2024-01-15 10:30:00", "2024-01-15 10:30"),
            ("2024-01-15T10:30:00", "2024-01-15 10:30"),
        ] {
            let dt = parse_date_string(input).unwrap();
            assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), expected, "{input}");
        }
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(parse_date_string("yesterday").is_none());
        assert!(parse_date_string("2024-13-45").is_none());
    }
}

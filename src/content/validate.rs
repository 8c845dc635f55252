//! Content-integrity checks for post front-matter

use anyhow::Result;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::frontmatter::parse_date_string;
use super::FrontMatter;

/// A single problem found in a post's front-matter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontMatterIssue {
    #[error("front-matter could not be parsed: {0}")]
    Unparseable(String),
    #[error("`title` is missing or empty")]
    MissingTitle,
    #[error("`date` is missing")]
    MissingDate,
    #[error("`date` is not a valid timestamp: {0:?}")]
    InvalidDate(String),
    #[error("`description` is missing or empty")]
    MissingDescription,
}

/// Check the required front-matter keys
pub fn validate(fm: &FrontMatter) -> Vec<FrontMatterIssue> {
    let mut issues = Vec::new();

    if is_blank(fm.title.as_deref()) {
        issues.push(FrontMatterIssue::MissingTitle);
    }

    match fm.date.as_deref() {
        None => issues.push(FrontMatterIssue::MissingDate),
        Some(date) if parse_date_string(date).is_none() => {
            issues.push(FrontMatterIssue::InvalidDate(date.to_string()))
        }
        Some(_) => {}
    }

    if is_blank(fm.description.as_deref()) {
        issues.push(FrontMatterIssue::MissingDescription);
    }

    issues
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

/// Issues found in one post file
#[derive(Debug, Clone)]
pub struct FileIssues {
    pub path: PathBuf,
    pub issues: Vec<FrontMatterIssue>,
}

/// Result of checking every post under a directory
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub checked: usize,
    pub failures: Vec<FileIssues>,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failures {
            writeln!(f, "{}:", failure.path.display())?;
            for issue in &failure.issues {
                writeln!(f, "  - {}", issue)?;
            }
        }
        write!(
            f,
            "{} post(s) checked, {} with problems",
            self.checked,
            self.failures.len()
        )
    }
}

/// Check the front-matter of every post file under `posts_dir`
pub fn check_posts(posts_dir: &Path) -> Result<IntegrityReport> {
    let mut report = IntegrityReport::default();
    if !posts_dir.exists() {
        return Ok(report);
    }

    for path in post_files(posts_dir) {
        report.checked += 1;
        let issues = match fs::read_to_string(&path) {
            Ok(content) => match FrontMatter::parse(&content) {
                Ok((fm, _)) => validate(&fm),
                Err(e) => vec![FrontMatterIssue::Unparseable(format!("{:#}", e))],
            },
            Err(e) => vec![FrontMatterIssue::Unparseable(e.to_string())],
        };
        if !issues.is_empty() {
            report.failures.push(FileIssues { path, issues });
        }
    }

    Ok(report)
}

/// Every markdown file under `posts_dir`, in a stable order
pub(crate) fn post_files(posts_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(posts_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_markdown_file(p))
        .collect()
}

/// Check if a file is a markdown file
pub(crate) fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fm(title: Option<&str>, date: Option<&str>, description: Option<&str>) -> FrontMatter {
        FrontMatter {
            title: title.map(String::from),
            date: date.map(String::from),
            description: description.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_frontmatter() {
        let fm = fm(Some("Hello"), Some("2015-05-01T22:12:03.284Z"), Some("Hi"));
        assert!(validate(&fm).is_empty());
    }

    #[test]
    fn test_every_missing_field_reported() {
        let issues = validate(&FrontMatter::default());
        assert_eq!(
            issues,
            vec![
                FrontMatterIssue::MissingTitle,
                FrontMatterIssue::MissingDate,
                FrontMatterIssue::MissingDescription,
            ]
        );
    }

    #[test]
    fn test_blank_strings_are_missing() {
        let issues = validate(&fm(Some("  "), Some("2020-01-01"), Some("")));
        assert_eq!(
            issues,
            vec![
                FrontMatterIssue::MissingTitle,
                FrontMatterIssue::MissingDescription
            ]
        );
    }

    #[test]
    fn test_invalid_date() {
        let issues = validate(&fm(Some("T"), Some("last tuesday"), Some("D")));
        assert_eq!(
            issues,
            vec![FrontMatterIssue::InvalidDate("last tuesday".to_string())]
        );
    }

    #[test]
    fn test_check_posts_reports_each_directory() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good-post");
        let bad = dir.path().join("bad-post");
        let broken = dir.path().join("broken-post");
        for d in [&good, &bad, &broken] {
            fs::create_dir_all(d).unwrap();
        }
        fs::write(
            good.join("index.md"),
            "---\ntitle: Good\ndate: 2020-01-01\ndescription: Fine\n---\nBody\n",
        )
        .unwrap();
        fs::write(bad.join("index.md"), "---\ntitle: Bad\n---\nBody\n").unwrap();
        fs::write(broken.join("index.md"), "---\ntitle: Broken\n").unwrap();
        fs::write(good.join("photo.png"), b"not markdown").unwrap();

        let report = check_posts(dir.path()).unwrap();
        assert_eq!(report.checked, 3);
        assert!(!report.is_ok());
        assert_eq!(report.failures.len(), 2);

        let bad_issues = report
            .failures
            .iter()
            .find(|f| f.path.starts_with(&bad))
            .unwrap();
        assert_eq!(
            bad_issues.issues,
            vec![
                FrontMatterIssue::MissingDate,
                FrontMatterIssue::MissingDescription
            ]
        );

        let broken_issues = report
            .failures
            .iter()
            .find(|f| f.path.starts_with(&broken))
            .unwrap();
        assert!(matches!(
            broken_issues.issues[0],
            FrontMatterIssue::Unparseable(_)
        ));

        let text = report.to_string();
        assert!(text.contains("3 post(s) checked, 2 with problems"));
    }

    #[test]
    fn test_unreadable_post_does_not_stop_the_check() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("a");
        let good = dir.path().join("b");
        fs::create_dir_all(&binary).unwrap();
        fs::create_dir_all(&good).unwrap();
        fs::write(binary.join("index.md"), b"\xff\xfe").unwrap();
        fs::write(
            good.join("index.md"),
            "---\ntitle: Good\ndate: 2020-01-01\ndescription: Fine\n---\nBody\n",
        )
        .unwrap();

        let report = check_posts(dir.path()).unwrap();
        assert_eq!(report.checked, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.starts_with(&binary));
        assert!(matches!(
            report.failures[0].issues[..],
            [FrontMatterIssue::Unparseable(_)]
        ));
    }

    #[test]
    fn test_check_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let report = check_posts(&dir.path().join("nope")).unwrap();
        assert_eq!(report.checked, 0);
        assert!(report.is_ok());
    }
}

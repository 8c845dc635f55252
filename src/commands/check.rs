//! Content-integrity check

use anyhow::{bail, Result};

use crate::Blog;

/// Check every post and print the report; fails when any post has problems
pub fn run(blog: &Blog) -> Result<()> {
    let report = blog.check()?;
    println!("{}", report);

    if !report.is_ok() {
        bail!("{} post(s) have invalid front-matter", report.failures.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_check_fails_on_bad_post() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let post = blog.content_dir.join("oops/index.md");
        fs::create_dir_all(post.parent().unwrap()).unwrap();
        fs::write(&post, "---\ntitle: Oops\n---\n").unwrap();

        assert!(run(&blog).is_err());

        fs::write(
            &post,
            "---\ntitle: Oops\ndate: 2021-03-04\ndescription: fixed\n---\n",
        )
        .unwrap();
        assert!(run(&blog).is_ok());
    }
}

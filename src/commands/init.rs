//! Initialize a new blog

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# penlog configuration

siteMetadata:
  title: My Blog
  author: John Doe
  authorFirstName: John
  description: A blog about code, written in words.
  siteUrl: http://localhost:8000
  social:
    twitter: johndoe

# Directory
content_dir: content/blog
assets_dir: content/assets
static_dir: static
public_dir: public

# Avatar, relative to assets_dir, shown at a fixed width
avatar: profile-pic.png
avatar_size: 50

# Writing
language: en
date_format: MMMM DD, YYYY
highlight_theme: base16-ocean.dark
render_drafts: false
"#;

/// A 1x1 transparent PNG used as a placeholder avatar
const PLACEHOLDER_AVATAR: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir.join("content/blog/hello-world"))?;
    fs::create_dir_all(target_dir.join("content/assets"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;
    fs::write(
        target_dir.join("content/assets/profile-pic.png"),
        PLACEHOLDER_AVATAR,
    )?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: "{}"
description: The first post on a brand new blog.
---

This is the first post. Every post lives in its own directory under
`content/blog`, next to the images it uses.

## Writing

```bash
$ penlog new "My New Post"
```

## Previewing

```bash
$ penlog server
```

## Publishing

```bash
$ penlog generate
```

Everything in `public/` is then ready to be uploaded.
"#,
        now.to_rfc3339()
    );

    fs::write(
        target_dir.join("content/blog/hello-world/index.md"),
        sample_post,
    )?;

    Ok(())
}

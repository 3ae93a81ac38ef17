// site.rs

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Deserialize;

use crate::content::{BlogIndexEntry, ContentSource};
use crate::error::ContentError;

pub const BLOG_PATH: &str = "/blog";
pub const POST_MANIFEST: &str = "posts.toml";

/// A built static site on disk.
///
/// `/about` is served from `<root>/about/index.html` (or `<root>/about.html`),
/// `/` from `<root>/index.html`. The blog index renders the posts listed in
/// `<root>/blog/posts.toml`.
#[derive(Debug, Clone)]
pub struct SiteDirectory {
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    posts: Vec<ManifestPost>,
}

#[derive(Debug, Deserialize)]
struct ManifestPost {
    slug: String,
    title: String,
    date: String,
    #[serde(default)]
    id: Option<String>,
}

impl From<ManifestPost> for BlogIndexEntry {
    fn from(post: ManifestPost) -> Self {
        BlogIndexEntry {
            id: post.id.unwrap_or_else(|| post.slug.clone()),
            title: post.title,
            date: post.date,
            slug: post.slug,
        }
    }
}

impl SiteDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(&self, path: &str) -> Result<Vec<PathBuf>, ContentError> {
        let segments: Vec<&str> = strip_query(path)
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        if segments.iter().any(|s| *s == "." || *s == ".." || s.contains('\\')) {
            return Err(ContentError::NotFound(path.to_string()));
        }
        let dir = segments.iter().fold(self.root.clone(), |acc, s| acc.join(s));
        let mut out = vec![dir.join("index.html")];
        if let Some(last) = segments.last() {
            let mut flat = dir.clone();
            flat.set_file_name(format!("{}.html", last));
            out.push(flat);
        }
        Ok(out)
    }

    fn read_manifest(&self) -> Result<Vec<BlogIndexEntry>, ContentError> {
        let path = self.root.join("blog").join(POST_MANIFEST);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let manifest: Manifest = toml::from_str(&raw)?;
        Ok(manifest.posts.into_iter().map(BlogIndexEntry::from).collect())
    }
}

impl ContentSource for SiteDirectory {
    fn fetch_page(&self, path: &str) -> Result<String, ContentError> {
        for file in self.candidates(path)? {
            match fs::read_to_string(&file) {
                Ok(html) => return Ok(html),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(ContentError::NotFound(path.to_string()))
    }

    fn list_visible_posts(&self, location: &str) -> Result<Vec<BlogIndexEntry>, ContentError> {
        if strip_query(location).trim_end_matches('/') != BLOG_PATH {
            return Ok(Vec::new());
        }
        self.read_manifest()
    }
}

pub fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> (tempfile::TempDir, SiteDirectory) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("index.html"), "<main>home</main>").unwrap();
        fs::create_dir_all(root.join("about")).unwrap();
        fs::write(root.join("about/index.html"), "<main>about</main>").unwrap();
        fs::write(root.join("contact.html"), "<main>contact</main>").unwrap();
        fs::create_dir_all(root.join("blog")).unwrap();
        fs::write(
            root.join("blog/posts.toml"),
            r#"
[[posts]]
slug = "hello-world"
title = "Hello World"
date = "2024-03-01"
id = "first"

[[posts]]
slug = "second-post"
title = "Second"
date = "2024-04-01"
"#,
        )
        .unwrap();
        let site = SiteDirectory::new(root);
        (tmp, site)
    }

    #[test]
    fn serves_pages_by_route() {
        let (_tmp, site) = site();
        assert_eq!(site.fetch_page("/").unwrap(), "<main>home</main>");
        assert_eq!(site.fetch_page("/about").unwrap(), "<main>about</main>");
        assert_eq!(site.fetch_page("/contact").unwrap(), "<main>contact</main>");
        assert!(matches!(site.fetch_page("/nope"), Err(ContentError::NotFound(_))));
        assert!(matches!(site.fetch_page("/../etc"), Err(ContentError::NotFound(_))));
    }

    #[test]
    fn posts_are_visible_only_on_the_blog_index() {
        let (_tmp, site) = site();
        assert!(site.list_visible_posts("/about").unwrap().is_empty());
        let posts = site.list_visible_posts("/blog?search=rust").unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "first");
        assert_eq!(posts[0].slug, "hello-world");
        assert_eq!(posts[1].id, "second-post");
    }

    #[test]
    fn missing_manifest_means_no_posts() {
        let tmp = tempfile::tempdir().unwrap();
        let site = SiteDirectory::new(tmp.path());
        assert!(site.list_visible_posts("/blog").unwrap().is_empty());
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("blog")).unwrap();
        fs::write(tmp.path().join("blog/posts.toml"), "[[posts]]\nslug = 3").unwrap();
        let site = SiteDirectory::new(tmp.path());
        assert!(matches!(
            site.list_visible_posts("/blog"),
            Err(ContentError::Manifest(_))
        ));
    }
}

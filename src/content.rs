// content.rs

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::ContentError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogIndexEntry {
    pub id: String,
    pub title: String,
    pub date: String,
    pub slug: String,
}

/// Where page markup and blog post summaries come from.
pub trait ContentSource {
    /// Raw markup of the page served at `path`.
    fn fetch_page(&self, path: &str) -> Result<String, ContentError>;

    /// Post summaries rendered on the page at `location`. Pages without
    /// post cards yield an empty list.
    fn list_visible_posts(&self, location: &str) -> Result<Vec<BlogIndexEntry>, ContentError>;
}

/// Process-lifetime cache of blog post summaries.
///
/// `id_to_slug` only holds posts whose id differs from their slug; any
/// other id resolves to itself.
#[derive(Debug, Default)]
pub struct BlogIndex {
    posts: Vec<BlogIndexEntry>,
    id_to_slug: HashMap<String, String>,
}

impl BlogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[BlogIndexEntry] {
        &self.posts
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Replaces the cache. An empty list leaves the cache untouched.
    pub fn fill(&mut self, posts: Vec<BlogIndexEntry>) {
        if posts.is_empty() {
            return;
        }
        self.id_to_slug = posts
            .iter()
            .filter(|p| p.id != p.slug)
            .map(|p| (p.id.clone(), p.slug.clone()))
            .collect();
        self.posts = posts;
    }

    /// Populates the cache from the posts visible at `location` if it is
    /// still empty. Returns whether the cache holds any posts afterwards.
    pub fn ensure_loaded(&mut self, source: &dyn ContentSource, location: &str) -> bool {
        if self.is_empty() {
            match source.list_visible_posts(location) {
                Ok(posts) => {
                    debug!(count = posts.len(), location, "caching blog posts");
                    self.fill(posts);
                }
                Err(e) => warn!(location, error = %e, "error caching blog posts data"),
            }
        }
        !self.is_empty()
    }

    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.id_to_slug.get(id).map(String::as_str).unwrap_or(id)
    }
}

/// Inner markup of the first `<main>` element.
pub fn extract_main(html: &str) -> Option<&str> {
    let lower = html.to_ascii_lowercase();
    let mut from = 0;
    let open = loop {
        let at = from + lower[from..].find("<main")?;
        let next = lower[at + 5..].chars().next()?;
        if next == '>' || next.is_ascii_whitespace() {
            break at;
        }
        from = at + 5;
    };
    let start = open + lower[open..].find('>')? + 1;
    let end = start + lower[start..].find("</main>")?;
    Some(&html[start..end])
}

// parser.rs

/// A typed line split on single spaces into a lowercased verb and its
/// arguments.
///
/// Arguments keep the case they were typed with and runs of spaces leave
/// empty arguments behind, so `rest` reproduces the remainder exactly.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CommandLine {
    pub verb: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Returns `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let mut tokens = line.split(' ');
        let verb = tokens.next()?.to_lowercase();
        Some(Self {
            verb,
            args: tokens.map(str::to_string).collect(),
        })
    }

    /// An empty argument counts as missing.
    pub fn arg(&self, n: usize) -> Option<&str> {
        self.args
            .get(n)
            .map(String::as_str)
            .filter(|a| !a.is_empty())
    }

    /// Everything after the verb, as typed.
    pub fn rest(&self) -> String {
        self.args.join(" ")
    }
}

/// Prepends `/` to pseudo-paths typed without one.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Matches `/blog/<slug>` where the slug is lowercase letters, digits and
/// hyphens, and returns the slug.
pub fn blog_post_slug(path: &str) -> Option<&str> {
    let slug = path.strip_prefix("/blog/")?;
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    valid.then_some(slug)
}

// commands.rs

use itertools::Itertools;
use tracing::{debug, warn};

use crate::content::{extract_main, BlogIndex, ContentSource};
use crate::error::ContentError;
use crate::history::HistoryStore;
use crate::navigation::{Completion, Navigator};
use crate::parser::{blog_post_slug, normalize_path, CommandLine};
use crate::routes::RouteTable;
use crate::site::BLOG_PATH;

pub const VERBS: &[&str] = &[
    "help", "ls", "cd", "cat", "pwd", "whoami", "date", "echo", "theme", "open", "blog",
    "view-post", "search-blog", "history", "back", "forward",
];

pub const HELP_TEXT: &str = "\
Available commands:
  help                     Show this help message
  ls                       List available pages
  ls blog                  List all blog posts
  cd [page]                Navigate to a page
  cat [page]               View page content
  pwd                      Show current page path
  whoami                   Display current user
  date                     Show current date/time
  echo [text]              Display text
  theme                    Show theme information
  open [page]              Open a page in the main content area
  blog                     Navigate to the blog
  view-post [id]           View a specific blog post by ID
  search-blog [query]      Search blog posts by keyword
  history                  Show command history
  back                     Go back in browser history
  forward                  Go forward in browser history

Navigation tips:
  - Use UP/DOWN arrow keys to navigate through command history
  - Press TAB for command auto-completion (coming soon)";

const POSTS_UNAVAILABLE: &str =
    "Blog posts could not be loaded. Navigate to the blog with \"cd /blog\" first.";

/// Static strings the terminal reports about its user and look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user: String,
    pub theme_name: String,
    pub theme_tagline: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            user: "guest".into(),
            theme_name: "Catppuccin Mocha".into(),
            theme_tagline: "A soothing pastel theme for the high-spirited!".into(),
        }
    }
}

/// What a command prints, plus the navigation it started, if any.
///
/// The text is written before the navigation settles, so it reports intent
/// rather than success.
#[derive(Debug)]
pub struct Reply {
    pub text: String,
    pub pending: Option<Completion>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), pending: None }
    }

    pub fn pending(text: impl Into<String>, completion: Completion) -> Self {
        Self { text: text.into(), pending: Some(completion) }
    }
}

/// Resolves typed lines against the fixed verb table.
///
/// Owns every piece of state commands share: the history store, the blog
/// post cache and the navigation mark used by `back`/`forward`.
pub struct Dispatcher {
    routes: RouteTable,
    history: HistoryStore,
    posts: BlogIndex,
    profile: Profile,
    navigator: Box<dyn Navigator>,
    content: Box<dyn ContentSource>,
    nav_mark: usize,
}

impl Dispatcher {
    pub fn new(
        routes: RouteTable,
        history: HistoryStore,
        navigator: Box<dyn Navigator>,
        content: Box<dyn ContentSource>,
    ) -> Self {
        Self {
            routes,
            history,
            posts: BlogIndex::new(),
            profile: Profile::default(),
            navigator,
            content,
            nav_mark: 0,
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Navigation stack depth recorded at the last outbound navigation.
    pub fn nav_mark(&self) -> usize {
        self.nav_mark
    }

    pub fn dispatch(&mut self, raw: &str) -> Reply {
        let Some(line) = CommandLine::parse(raw) else {
            return Reply::text("");
        };
        debug!(verb = %line.verb, args = ?line.args, "dispatching");
        match line.verb.as_str() {
            "help" => Reply::text(HELP_TEXT),
            "ls" => Reply::text(match line.arg(0) {
                Some("blog") => self.list_posts(),
                _ => self.list_pages(),
            }),
            "cd" => self.change_directory(line.arg(0)),
            "cat" => Reply::text(self.view_page(line.arg(0))),
            "pwd" => Reply::text(self.navigator.location()),
            "whoami" => Reply::text(self.profile.user.clone()),
            "date" => Reply::text(
                chrono::Local::now()
                    .format("%a %b %d %Y %H:%M:%S GMT%z")
                    .to_string(),
            ),
            "echo" => Reply::text(line.rest()),
            "theme" => Reply::text(format!(
                "Current theme: {}\n{}",
                self.profile.theme_name, self.profile.theme_tagline
            )),
            "open" => self.open_page(line.arg(0)),
            "blog" => {
                let completion = self.navigate(BLOG_PATH);
                Reply::pending(
                    format!("Navigating to blog...\nNavigating to {}...", BLOG_PATH),
                    completion,
                )
            }
            "view-post" => self.view_post(line.arg(0)),
            "search-blog" => self.search_blog(&line.rest()),
            "history" => Reply::text(self.show_history()),
            "back" => self.back(),
            "forward" => self.forward(),
            other => Reply::text(format!(
                "Command not found: {}. Type 'help' for available commands.",
                other
            )),
        }
    }

    /// Records the stack depth, then starts a full-page navigation.
    fn navigate(&mut self, path: &str) -> Completion {
        self.nav_mark = self.navigator.depth();
        self.navigator.assign(path)
    }

    fn list_pages(&self) -> String {
        self.routes
            .iter()
            .map(|r| format!("{} - {}", r.path, r.name))
            .join("\n")
    }

    fn list_posts(&mut self) -> String {
        let location = self.navigator.location();
        if !self.posts.ensure_loaded(self.content.as_ref(), &location) {
            return POSTS_UNAVAILABLE.to_string();
        }
        self.posts
            .posts()
            .iter()
            .map(|p| format!("[{}] {} - {}", p.id, p.title, p.date))
            .join("\n")
    }

    fn change_directory(&mut self, arg: Option<&str>) -> Reply {
        let Some(path) = arg else {
            return Reply::text("Please specify a path. Example: cd /about");
        };
        if let Some(slug) = blog_post_slug(path) {
            return self.view_post(Some(slug));
        }
        let target = normalize_path(path);
        match self.routes.name_of(&target).map(str::to_string) {
            Some(name) => {
                let completion = self.navigate(&target);
                Reply::pending(format!("Navigating to {}...", name), completion)
            }
            None => Reply::text(format!("Directory not found: {}", path)),
        }
    }

    fn view_page(&self, arg: Option<&str>) -> String {
        let Some(path) = arg else {
            return "Please specify a path. Example: cat /about".to_string();
        };
        if let Some(slug) = blog_post_slug(path) {
            return format!(
                "Viewing blog post: {slug}\nUse 'view-post {slug}' to open the full post."
            );
        }
        let target = normalize_path(path);
        match self.routes.name_of(&target) {
            Some(name) => format!(
                "Viewing content for {name} (preview):\n-----\n\
                 This is a preview of the {name} page content.\n\
                 Use 'cd {target}' to navigate to the full page.\n-----"
            ),
            None => format!("File not found: {}", path),
        }
    }

    /// Splices the page's main region into the current view and pushes a
    /// history entry, without a full navigation.
    fn open_page(&mut self, arg: Option<&str>) -> Reply {
        let Some(path) = arg else {
            return Reply::text("Please specify a path. Example: open /about");
        };
        let target = normalize_path(path);
        let Some(name) = self.routes.name_of(&target).map(str::to_string) else {
            return Reply::text(format!("Page not found: {}", path));
        };

        let (signal, completion) = Completion::pair();
        let main = self.content.fetch_page(&target).and_then(|html| {
            extract_main(&html)
                .map(str::to_string)
                .ok_or_else(|| ContentError::MissingMain(target.clone()))
        });
        match main {
            Ok(main) => {
                self.navigator.replace_main(main);
                self.navigator.push_state(&name, &target);
                self.nav_mark = self.navigator.depth();
                signal.finish(Ok(()));
            }
            Err(e) => {
                warn!(path = %target, error = %e, "failed to open page");
                signal.finish(Err(e.into()));
            }
        }
        Reply::pending(format!("Opening {} in main content area...", name), completion)
    }

    fn view_post(&mut self, arg: Option<&str>) -> Reply {
        let Some(id) = arg else {
            return Reply::text("Please specify a post ID. Example: view-post my-first-post");
        };
        let location = self.navigator.location();
        if !self.posts.ensure_loaded(self.content.as_ref(), &location) {
            return Reply::text(POSTS_UNAVAILABLE);
        }
        let target = format!("{}/{}", BLOG_PATH, self.posts.resolve(id));
        let completion = self.navigate(&target);
        Reply::pending(format!("Opening blog post: {}...", id), completion)
    }

    fn search_blog(&mut self, query: &str) -> Reply {
        if query.is_empty() {
            return Reply::text("Please provide a search term. Example: search-blog javascript");
        }
        let target = format!("{}?search={}", BLOG_PATH, urlencoding::encode(query));
        let completion = self.navigate(&target);
        Reply::pending(format!("Searching blog for \"{}\"...", query), completion)
    }

    fn show_history(&mut self) -> String {
        let entries = self.history.all();
        if entries.is_empty() {
            return "No command history available.".to_string();
        }
        entries
            .iter()
            .enumerate()
            .map(|(i, cmd)| format!("{:>3}  {}", i + 1, cmd))
            .join("\n")
    }

    // The mark is compared against the live stack depth, so navigations made
    // outside the terminal shift what counts as "previous".
    fn back(&mut self) -> Reply {
        let depth = self.navigator.depth();
        if depth > 1 && depth > self.nav_mark {
            Reply::pending("Navigating back...", self.navigator.back())
        } else {
            Reply::text("No previous page in history.")
        }
    }

    fn forward(&mut self) -> Reply {
        if self.nav_mark + 1 < self.navigator.depth() {
            Reply::pending("Navigating forward...", self.navigator.forward())
        } else {
            Reply::text("No next page in history.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::SessionNavigator;
    use crate::storage::MemoryStorage;

    struct NoContent;

    impl ContentSource for NoContent {
        fn fetch_page(&self, path: &str) -> Result<String, ContentError> {
            Err(ContentError::NotFound(path.into()))
        }
        fn list_visible_posts(
            &self,
            _location: &str,
        ) -> Result<Vec<crate::content::BlogIndexEntry>, ContentError> {
            Ok(Vec::new())
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            RouteTable::default(),
            HistoryStore::new(Box::new(MemoryStorage::new())),
            Box::new(SessionNavigator::default()),
            Box::new(NoContent),
        )
    }

    fn run(d: &mut Dispatcher, line: &str) -> String {
        d.dispatch(line).text
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let mut d = dispatcher();
        for blank in ["", "   "] {
            let reply = d.dispatch(blank);
            assert_eq!(reply.text, "");
            assert!(reply.pending.is_none());
        }
        assert!(d.history_mut().all().is_empty());
    }

    #[test]
    fn help_lists_every_verb() {
        let mut d = dispatcher();
        let help = run(&mut d, "HELP");
        for verb in VERBS {
            assert!(help.contains(&format!("  {}", verb)), "missing {}", verb);
        }
    }

    #[test]
    fn ls_lists_routes_in_order() {
        let mut d = dispatcher();
        assert_eq!(
            run(&mut d, "ls"),
            "/ - Home\n/about - About\n/projects - Projects\n/blog - Blog\n/contact - Contact"
        );
    }

    #[test]
    fn echo_keeps_argument_case() {
        let mut d = dispatcher();
        assert_eq!(run(&mut d, "Echo Hello   World"), "Hello   World");
        assert_eq!(run(&mut d, "echo a   b\tc"), "a   b\tc");
        assert_eq!(run(&mut d, "echo"), "");
    }

    #[test]
    fn static_replies() {
        let mut d = dispatcher().with_profile(Profile {
            user: "visitor".into(),
            ..Profile::default()
        });
        assert_eq!(run(&mut d, "whoami"), "visitor");
        assert_eq!(run(&mut d, "pwd"), "/");
        assert_eq!(
            run(&mut d, "theme"),
            "Current theme: Catppuccin Mocha\nA soothing pastel theme for the high-spirited!"
        );
        assert!(!run(&mut d, "date").is_empty());
    }

    #[test]
    fn cat_previews_without_navigating() {
        let mut d = dispatcher();
        let out = run(&mut d, "cat about");
        assert!(out.starts_with("Viewing content for About (preview):"));
        assert!(out.contains("Use 'cd /about' to navigate to the full page."));
        assert_eq!(run(&mut d, "cat /nope"), "File not found: /nope");
        assert_eq!(
            run(&mut d, "cat /blog/hello-world"),
            "Viewing blog post: hello-world\nUse 'view-post hello-world' to open the full post."
        );
        assert_eq!(d.navigator().depth(), 1);
    }

    #[test]
    fn missing_arguments_give_usage() {
        let mut d = dispatcher();
        assert_eq!(run(&mut d, "cd"), "Please specify a path. Example: cd /about");
        assert_eq!(run(&mut d, "cat"), "Please specify a path. Example: cat /about");
        assert_eq!(run(&mut d, "open"), "Please specify a path. Example: open /about");
        assert_eq!(run(&mut d, "cd  about"), "Please specify a path. Example: cd /about");
        assert_eq!(
            run(&mut d, "view-post"),
            "Please specify a post ID. Example: view-post my-first-post"
        );
        assert_eq!(
            run(&mut d, "search-blog"),
            "Please provide a search term. Example: search-blog javascript"
        );
        assert_eq!(d.navigator().depth(), 1);
    }

    #[test]
    fn unknown_verbs_are_reported_lowercased() {
        let mut d = dispatcher();
        assert_eq!(
            run(&mut d, "SUDO rm"),
            "Command not found: sudo. Type 'help' for available commands."
        );
    }

    #[test]
    fn history_is_numbered_and_padded() {
        let mut d = dispatcher();
        assert_eq!(run(&mut d, "history"), "No command history available.");
        d.history_mut().record("ls");
        d.history_mut().record("cd about");
        assert_eq!(run(&mut d, "history"), "  1  ls\n  2  cd about");
    }

    #[test]
    fn view_post_needs_loaded_posts() {
        let mut d = dispatcher();
        assert_eq!(run(&mut d, "view-post anything"), POSTS_UNAVAILABLE);
        assert_eq!(run(&mut d, "ls blog"), POSTS_UNAVAILABLE);
        assert_eq!(d.navigator().location(), "/");
    }
}

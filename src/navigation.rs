// navigation.rs

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::debug;

use crate::error::NavigationError;
use crate::site::strip_query;

/// Completion side of a navigation that was started but may not have
/// finished. Callers may wait on it or drop it.
#[derive(Debug)]
pub struct Completion {
    rx: Receiver<Result<(), NavigationError>>,
}

/// Producer side of a [`Completion`].
#[derive(Debug)]
pub struct Signal {
    tx: Sender<Result<(), NavigationError>>,
}

impl Signal {
    pub fn finish(self, result: Result<(), NavigationError>) {
        // The waiter may already be gone; nobody is left to tell.
        let _ = self.tx.send(result);
    }
}

impl Completion {
    pub fn pair() -> (Signal, Completion) {
        let (tx, rx) = mpsc::channel();
        (Signal { tx }, Completion { rx })
    }

    pub fn ready(result: Result<(), NavigationError>) -> Self {
        let (signal, completion) = Self::pair();
        signal.finish(result);
        completion
    }

    /// Blocks until the navigation settles.
    pub fn wait(self) -> Result<(), NavigationError> {
        self.rx.recv().unwrap_or(Err(NavigationError::Dropped))
    }

    /// `None` while still in flight.
    pub fn poll(&self) -> Option<Result<(), NavigationError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(NavigationError::Dropped)),
        }
    }
}

/// The page/session the terminal is embedded in.
pub trait Navigator {
    /// Path of the current page, without query string.
    fn location(&self) -> String;

    /// Full-page navigation to `path` (may carry a query string).
    fn assign(&mut self, path: &str) -> Completion;

    /// Adds a history entry for `path` without loading it.
    fn push_state(&mut self, title: &str, path: &str);

    /// Replaces the main content region of the current view.
    fn replace_main(&mut self, html: String);

    fn back(&mut self) -> Completion;

    fn forward(&mut self) -> Completion;

    /// Depth of the navigation stack.
    fn depth(&self) -> usize;
}

/// In-memory browsing session with a browser-style history stack.
#[derive(Debug, Clone)]
pub struct SessionNavigator {
    entries: Vec<String>,
    index: usize,
    main: Option<String>,
}

impl Default for SessionNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl SessionNavigator {
    pub fn new(start: &str) -> Self {
        Self {
            entries: vec![start.to_string()],
            index: 0,
            main: None,
        }
    }

    /// Full URL path of the current entry, query included.
    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    pub fn main_content(&self) -> Option<&str> {
        self.main.as_deref()
    }

    fn push(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_string());
        self.index = self.entries.len() - 1;
    }
}

impl Navigator for SessionNavigator {
    fn location(&self) -> String {
        strip_query(self.current()).to_string()
    }

    fn assign(&mut self, path: &str) -> Completion {
        debug!(from = %self.current(), to = path, "navigating");
        self.push(path);
        self.main = None;
        Completion::ready(Ok(()))
    }

    fn push_state(&mut self, title: &str, path: &str) {
        debug!(title, path, "pushing history state");
        self.push(path);
    }

    fn replace_main(&mut self, html: String) {
        self.main = Some(html);
    }

    fn back(&mut self) -> Completion {
        if self.index == 0 {
            return Completion::ready(Err(NavigationError::NoPrevious));
        }
        self.index -= 1;
        self.main = None;
        Completion::ready(Ok(()))
    }

    fn forward(&mut self) -> Completion {
        if self.index + 1 >= self.entries.len() {
            return Completion::ready(Err(NavigationError::NoNext));
        }
        self.index += 1;
        self.main = None;
        Completion::ready(Ok(()))
    }

    fn depth(&self) -> usize {
        self.entries.len()
    }
}

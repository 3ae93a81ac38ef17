pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod content;
pub mod error;
pub mod history;
pub mod navigation;
pub mod parser;
pub mod repl;
pub mod routes;
pub mod site;
pub mod storage;
pub mod util;

pub use commands::{Dispatcher, Reply};
pub use history::HistoryStore;

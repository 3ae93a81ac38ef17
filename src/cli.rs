// cli.rs

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "site-terminal")]
#[command(about = "Navigate a static site with shell-like commands")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./site-terminal.toml when present)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Built site directory (overrides config)
    #[arg(long)]
    pub site: Option<PathBuf>,

    /// Directory to persist command history in (overrides config)
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    #[arg(short = 'l', long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Shortcut for --log-level=debug
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single command line and exit
    #[arg(short = 'c', long)]
    pub command: Option<String>,
}

impl Cli {
    /// Flags win over the config value; the fallback keeps logs off the
    /// terminal unless something is wrong.
    pub fn level_filter(&self, configured: Option<&str>) -> LevelFilter {
        if self.verbose {
            return LevelFilter::DEBUG;
        }
        if let Some(level) = self.log_level {
            return level.into();
        }
        configured
            .and_then(|s| s.parse().ok())
            .unwrap_or(LevelFilter::WARN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_beats_everything() {
        let cli = Cli::parse_from(["site-terminal", "-v", "--log-level", "error"]);
        assert_eq!(cli.level_filter(Some("trace")), LevelFilter::DEBUG);
    }

    #[test]
    fn falls_back_to_config_then_warn() {
        let cli = Cli::parse_from(["site-terminal"]);
        assert_eq!(cli.level_filter(Some("info")), LevelFilter::INFO);
        assert_eq!(cli.level_filter(Some("nonsense")), LevelFilter::WARN);
        assert_eq!(cli.level_filter(None), LevelFilter::WARN);
    }

    #[test]
    fn parses_one_shot_command() {
        let cli = Cli::parse_from(["site-terminal", "-c", "ls blog", "--site", "public"]);
        assert_eq!(cli.command.as_deref(), Some("ls blog"));
        assert_eq!(cli.site, Some(PathBuf::from("public")));
    }
}

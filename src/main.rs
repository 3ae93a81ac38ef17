use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use site_terminal::cli::Cli;
use site_terminal::config::TerminalConfig;
use site_terminal::navigation::SessionNavigator;
use site_terminal::repl::{start_repl, submit};
use site_terminal::site::SiteDirectory;
use site_terminal::storage::{FileStorage, KeyValueStore, MemoryStorage};
use site_terminal::{Dispatcher, HistoryStore};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = TerminalConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::builder()
        .with_default_directive(cli.level_filter(config.log_level.as_deref()).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(site) = cli.site.clone() {
        config.site_root = site;
    }
    if let Some(dir) = cli.state_dir.clone() {
        config.history.state_dir = Some(dir);
    }

    let storage: Box<dyn KeyValueStore> = match &config.history.state_dir {
        Some(dir) => Box::new(FileStorage::new(dir)),
        None => {
            info!("no history state directory configured; history stays in memory");
            Box::new(MemoryStorage::new())
        }
    };
    info!(site = %config.site_root.display(), "starting terminal");

    let history =
        HistoryStore::with_limits(storage, &config.history.key, config.history.max_entries);
    let mut dispatcher = Dispatcher::new(
        config.route_table(),
        history,
        Box::new(SessionNavigator::default()),
        Box::new(SiteDirectory::new(&config.site_root)),
    )
    .with_profile(config.profile());

    match cli.command.as_deref() {
        Some(line) => submit(&mut dispatcher, line),
        None => start_repl(&mut dispatcher, &config.prompt, &config.banner),
    }
}

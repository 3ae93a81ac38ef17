// repl.rs

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rustyline::config::BellStyle;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{
    Cmd, CompletionType, ConditionalEventHandler, Config, Editor, Event, EventContext,
    EventHandler, KeyCode, KeyEvent, Modifiers, Movement, RepeatCount,
};
use tracing::{debug, warn};

use crate::commands::Dispatcher;
use crate::completion::TerminalHelper;
use crate::history::Recall;
use crate::util::write_reply;

#[derive(Clone, Copy, Debug)]
enum Direction {
    Older,
    Newer,
}

/// Up/Down binding that replaces the whole line with a recalled entry.
struct RecallKey {
    recall: Arc<Mutex<Recall>>,
    direction: Direction,
}

impl ConditionalEventHandler for RecallKey {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        _ctx: &EventContext,
    ) -> Option<Cmd> {
        let mut recall = self.recall.lock().ok()?;
        let line = match self.direction {
            Direction::Older => recall.up(),
            Direction::Newer => recall.down(),
        };
        Some(match line {
            Some(line) => Cmd::Replace(Movement::WholeLine, Some(line)),
            None => Cmd::Noop,
        })
    }
}

/// Runs one submitted line: dispatch, print, then record it.
pub fn submit(dispatcher: &mut Dispatcher, line: &str) -> Result<()> {
    if line.trim().is_empty() {
        return Ok(());
    }
    let reply = dispatcher.dispatch(line);
    write_reply(std::io::stdout(), &reply.text).context("failed to write output")?;
    if let Some(Err(e)) = reply.pending.as_ref().and_then(|c| c.poll()) {
        warn!(line, error = %e, "navigation failed");
    }
    dispatcher.history_mut().record(line);
    Ok(())
}

pub fn start_repl(dispatcher: &mut Dispatcher, prompt: &str, banner: &str) -> Result<()> {
    let config = Config::builder()
        .completion_type(CompletionType::List)
        .bell_style(BellStyle::None)
        .auto_add_history(false)
        .build();
    let mut rl: Editor<TerminalHelper, DefaultHistory> =
        Editor::with_config(config).context("failed to create line editor")?;
    rl.set_helper(Some(TerminalHelper::new()));

    let recall = Arc::new(Mutex::new(Recall::new(dispatcher.history_mut().all().to_vec())));
    for (code, direction) in [(KeyCode::Up, Direction::Older), (KeyCode::Down, Direction::Newer)] {
        let handler = RecallKey { recall: Arc::clone(&recall), direction };
        rl.bind_sequence(
            KeyEvent(code, Modifiers::NONE),
            EventHandler::Conditional(Box::new(handler)),
        );
    }

    write_reply(std::io::stdout(), banner).context("failed to write banner")?;
    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                submit(dispatcher, &line)?;
                let entries = dispatcher.history_mut().all().to_vec();
                if let Ok(mut recall) = recall.lock() {
                    recall.reset(entries);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                debug!("input closed");
                break;
            }
            Err(err) => return Err(err).context("failed to read line"),
        }
    }
    Ok(())
}

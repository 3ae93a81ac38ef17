// completion.rs

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

/// Line-editor helper for the terminal prompt.
///
/// Tab is reserved for command completion; until that lands the completer
/// offers nothing, so Tab leaves the line as typed.
#[derive(Debug, Default)]
pub struct TerminalHelper;

impl TerminalHelper {
    pub fn new() -> Self {
        Self
    }
}

impl Completer for TerminalHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        _line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        Ok((pos, Vec::new()))
    }
}

impl Hinter for TerminalHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for TerminalHelper {}

impl Validator for TerminalHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for TerminalHelper {}

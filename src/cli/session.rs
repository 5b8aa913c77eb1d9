use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::debug;

use crate::cli::commands::ShellLine;
use crate::cli::handlers::execute;
use crate::io::{config_io, garage_io};
use crate::model::config::Config;
use crate::model::garage::Garage;
use crate::ops::due::DueThresholds;

/// Everything one run of `pit` works against. The garage lives only as
/// long as the session.
pub struct Session {
    pub garage: Garage,
    pub config: Config,
    pub today: NaiveDate,
}

impl Session {
    pub fn open(
        config_path: Option<&Path>,
        seed: Option<&Path>,
        today: Option<NaiveDate>,
    ) -> Result<Session, Box<dyn std::error::Error>> {
        let cwd = std::env::current_dir()?;
        let config = config_io::load_config(config_path, &cwd)?;
        let garage = garage_io::load_garage(seed, config.undo.window())?;
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        debug!(%today, "session opened");
        Ok(Session {
            garage,
            config,
            today,
        })
    }

    pub fn thresholds(&self) -> DueThresholds {
        DueThresholds::from(&self.config.reminders)
    }

    pub fn currency(&self) -> &str {
        &self.config.display.currency
    }
}

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

/// Split a command line into words. Single and double quotes group words;
/// a backslash escapes the next character outside single quotes.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('\''), _) => current.push(c),
            (_, '\\') => {
                let escaped = chars.next().ok_or("trailing backslash")?;
                current.push(escaped);
                in_word = true;
            }
            (Some(_), _) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, _) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Run commands line by line against one session until end of input or
/// `exit`/`quit`. Failing commands report `error: ...` and the loop goes on.
/// Returns the number of failed commands.
pub fn run_shell<R: BufRead>(session: &mut Session, input: R, json: bool) -> std::io::Result<usize> {
    let interactive = std::io::stdin().is_terminal();
    let mut failures = 0;
    let mut lines = input.lines();
    loop {
        if interactive {
            print!("pit> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        let words = match split_words(trimmed) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("error: {}", e);
                failures += 1;
                continue;
            }
        };
        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(e) => {
                // help and usage errors render themselves
                e.print()?;
                if e.use_stderr() {
                    failures += 1;
                }
                continue;
            }
        };
        if let Err(e) = execute(session, parsed.command, json || parsed.json) {
            eprintln!("error: {}", e);
            failures += 1;
        }
    }
    Ok(failures)
}

//! Line-oriented command loop.
//!
//! Reads commands from any `BufRead` and writes prompts and results to any
//! `Write`, so the whole interaction can be driven in-process.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, info};
use window_engine::visualize;
use window_engine::{EngineError, Session, TimeConverter};

pub const BANNER: &str = "\
Commands: add   - add a new constraint
          run   - find the common time frame
          clear - clear all the constraints
          vis   - visualize the constraints
          help  - show this list
          quit  - quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Add,
    Clear,
    Visualize,
    Run,
    Help,
    Quit,
    Unknown,
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "add" => Command::Add,
            "clear" => Command::Clear,
            "vis" => Command::Visualize,
            "run" => Command::Run,
            "help" => Command::Help,
            "quit" => Command::Quit,
            _ => Command::Unknown,
        }
    }
}

pub struct Repl<R, W, C> {
    input: R,
    output: W,
    session: Session<C>,
}

impl<R: BufRead, W: Write, C: TimeConverter> Repl<R, W, C> {
    pub fn new(input: R, output: W, session: Session<C>) -> Self {
        Self {
            input,
            output,
            session,
        }
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Running Cross Timezone Coordinator...\n{}\n", BANNER)?;

        while let Some(line) = self.prompt("command: ")? {
            match Command::parse(&line) {
                Command::Add => self.add()?,
                Command::Clear => {
                    self.session.clear();
                    writeln!(self.output, "All constraints have been cleared.")?;
                }
                Command::Visualize => self.visualize()?,
                Command::Run => self.find_window()?,
                Command::Help => writeln!(self.output, "{}", BANNER)?,
                Command::Quit => break,
                Command::Unknown => writeln!(self.output, "Invalid command.")?,
            }
        }

        writeln!(self.output, "Quitting...")?;
        self.output.flush().context("Failed to flush output")?;
        Ok(())
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    /// Write `label`, then read one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Prompt until a valid `HHMM` is entered. `None` at end of input.
    fn prompt_time(&mut self, label: &str, which: &str) -> Result<Option<String>> {
        while let Some(raw) = self.prompt(label)? {
            if window_engine::hhmm::is_valid_hhmm(&raw) {
                return Ok(Some(raw));
            }
            writeln!(self.output, "Invalid {} time input.", which)?;
        }
        Ok(None)
    }

    fn add(&mut self) -> Result<()> {
        let Some(location) = self.prompt("Location: ")? else {
            return Ok(());
        };
        let Some(start) = self.prompt_time("Start time (HHMM): ", "start")? else {
            return Ok(());
        };
        let Some(end) = self.prompt_time("End time (HHMM): ", "end")? else {
            return Ok(());
        };

        match self.session.add(location.trim(), &start, &end) {
            Ok(constraint) => {
                info!(location = location.trim(), start = %constraint.start, end = %constraint.end, "constraint added");
                writeln!(
                    self.output,
                    "Added constraint #{}: {} to {} UTC.",
                    self.session.constraint_count(),
                    constraint.start.format("%H:%M"),
                    constraint.end.format("%H:%M")
                )?;
            }
            Err(e) => {
                debug!(error = %e, "add aborted");
                writeln!(self.output, "Could not add constraint: {}", e)?;
            }
        }
        Ok(())
    }

    fn visualize(&mut self) -> Result<()> {
        match self.session.visualize() {
            Ok(bars) => {
                writeln!(self.output, "{}  (UTC, 00:00 to 24:00)", visualize::ruler())?;
                let locations = self.session.store().locations();
                for (bar, location) in bars.iter().zip(locations) {
                    writeln!(self.output, "{}  {}", bar, location)?;
                }
            }
            Err(EngineError::InsufficientConstraints { required, .. }) => writeln!(
                self.output,
                "You need at least {} constraints to visualize.",
                required
            )?,
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(())
    }

    fn find_window(&mut self) -> Result<()> {
        match self.session.run() {
            Ok(Some(window)) => {
                writeln!(self.output, "There is a common time frame {}", window)?
            }
            Ok(None) => writeln!(self.output, "No common time frame for the set limits.")?,
            Err(EngineError::InsufficientConstraints { required, .. }) => writeln!(
                self.output,
                "You need at least {} constraints to run.",
                required
            )?,
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(())
    }
}

//! Host integration.
//!
//! A host is whatever owns the read-eval loop: a shell with pre-exec and
//! pre-prompt hooks, or the built-in [`Session`] REPL. The timer only needs
//! the two lifecycle callbacks in [`LifecycleHooks`]; [`Session`] wires them
//! around a [`Host`] that knows how to read and run lines.

use std::io;

use tracing::{debug, info, warn};

use crate::clock::ClockSampler;
use crate::events::Event;
use crate::timer::CommandTimer;

/// The two callbacks a host invokes around each user command.
pub trait LifecycleHooks {
    fn before_command(&mut self, line: &str) -> Option<Event>;
    fn after_command(&mut self) -> Option<Event>;
}

impl<C: ClockSampler> LifecycleHooks for CommandTimer<C> {
    fn before_command(&mut self, line: &str) -> Option<Event> {
        CommandTimer::before_command(self, line)
    }

    fn after_command(&mut self) -> Option<Event> {
        CommandTimer::after_command(self)
    }
}

/// A read-eval loop the session decorates.
pub trait Host {
    /// Next user line, or `None` at end of input.
    fn read_command(&mut self) -> io::Result<Option<String>>;

    /// Run a user line and return its exit status.
    fn execute(&mut self, line: &str) -> io::Result<i32>;

    /// Work the host does for itself before each prompt. Runs with the
    /// timer's reentrancy guard held.
    fn before_prompt(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Write a user-visible line.
    fn emit(&mut self, line: &str);
}

/// Commands that end a session.
const EXIT_COMMANDS: &[&str] = &["exit", "logout"];

/// A timed REPL: the host's loop with the timer hooked in.
pub struct Session<H, C> {
    host: H,
    timer: CommandTimer<C>,
    events: Vec<Event>,
}

impl<H: Host, C: ClockSampler> Session<H, C> {
    pub fn new(host: H, timer: CommandTimer<C>) -> Self {
        Self {
            host,
            timer,
            events: Vec::new(),
        }
    }

    pub fn timer(&self) -> &CommandTimer<C> {
        &self.timer
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Events produced so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Run until end of input or an exit command.
    ///
    /// # Errors
    ///
    /// Only failures to read input end the session early.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.timer.enter_internal();
            let prompt = self.host.before_prompt();
            self.timer.exit_internal();
            if let Err(e) = prompt {
                warn!(error = %e, "prompt hook failed");
            }

            let Some(line) = self.host.read_command()? else {
                debug!("end of input");
                return Ok(());
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if EXIT_COMMANDS.contains(&line) {
                return Ok(());
            }
            self.step(line);
        }
    }

    /// Time a single line.
    pub fn step(&mut self, line: &str) {
        if let Some(ev) = self.timer.before_command(line) {
            self.events.push(ev);
        }

        if self.timer.is_bypass(line) {
            match self.timer.last_report() {
                Some(report) => self.host.emit(&report),
                None => info!("no command has been timed yet"),
            }
        } else {
            match self.host.execute(line) {
                Ok(status) if status != 0 => debug!(status, command = line, "command failed"),
                Ok(_) => {}
                Err(e) => warn!(error = %e, command = line, "cannot run command"),
            }
        }

        if let Some(ev) = self.timer.after_command() {
            if let Some(report) = ev.report_line() {
                self.host.emit(&report);
            }
            self.events.push(ev);
        }
    }

    pub fn into_parts(self) -> (H, CommandTimer<C>) {
        (self.host, self.timer)
    }
}

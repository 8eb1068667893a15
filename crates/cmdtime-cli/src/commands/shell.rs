//! Session mode: a minimal REPL that runs each line through a real shell
//! and times it in-process.

use std::io::{self, BufRead, Write};
use std::process::{Command, Stdio};

use clap::Args;
use cmdtime_core::{CommandTimer, Config, CoreError, Host, Session, SystemClock};
use tracing::{debug, info};

#[derive(Args)]
pub struct ShellArgs {
    /// Program used to run each line (default: config `shell`, then $SHELL, then sh)
    #[arg(long)]
    pub program: Option<String>,
    /// Prompt string
    #[arg(long, default_value = "cmdtime> ")]
    pub prompt: String,
}

/// Reads lines from stdin and runs them with `<program> -c <line>`.
pub struct ProcessHost<R, W> {
    program: String,
    prompt: String,
    prompt_command: Option<String>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ProcessHost<R, W> {
    pub fn new(
        program: String,
        prompt: String,
        prompt_command: Option<String>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            program,
            prompt,
            prompt_command,
            input,
            output,
        }
    }

    fn run_program(&self, line: &str, quiet: bool) -> io::Result<i32> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-c").arg(line);
        if quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        let status = cmd.status()?;
        Ok(status.code().unwrap_or(-1))
    }
}

impl<R: BufRead, W: Write> Host for ProcessHost<R, W> {
    fn read_command(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "{}", self.prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn execute(&mut self, line: &str) -> io::Result<i32> {
        self.output.flush()?;
        self.run_program(line, false)
    }

    fn before_prompt(&mut self) -> io::Result<()> {
        if let Some(cmd) = &self.prompt_command {
            let status = self.run_program(cmd, true)?;
            debug!(status, "prompt command finished");
        }
        Ok(())
    }

    fn emit(&mut self, line: &str) {
        let _ = writeln!(self.output, "{line}");
    }
}

fn resolve_program(arg: Option<String>, config: &Config) -> String {
    arg.or_else(|| config.shell.clone())
        .or_else(|| std::env::var("SHELL").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "sh".to_string())
}

pub fn run(args: ShellArgs) -> Result<(), CoreError> {
    let config = Config::load_or_default();
    let program = resolve_program(args.program, &config);
    let timer = CommandTimer::new(config.settings(), SystemClock)?;
    info!(program = %program, overhead_ns = timer.overhead().as_nanos() as u64, "session started");

    let stdin = io::stdin();
    let host = ProcessHost::new(
        program,
        args.prompt,
        config.prompt_command.clone(),
        stdin.lock(),
        io::stdout(),
    );
    let mut session = Session::new(host, timer);
    session.run()?;
    Ok(())
}

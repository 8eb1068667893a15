use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "cmdtime", version, about = "Time shell commands and report the slow ones")]
pub struct Cli {
    /// Log filter (overrides CMDTIME_LOG), e.g. "debug" or "cmdtime_core=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current timestamp (seconds.nanoseconds)
    Now,
    /// Measure the cost of sampling the clock
    Calibrate(commands::clock::CalibrateArgs),
    /// Format a number of seconds
    Format(commands::format::FormatArgs),
    /// Finish a measurement started by a shell hook
    Finish(commands::finish::FinishArgs),
    /// Print shell integration code
    Init {
        #[arg(value_enum)]
        shell: commands::init::HookShell,
    },
    /// Run an interactive shell with every command timed
    Shell(commands::shell::ShellArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.no_color);

    let result = match cli.command {
        Commands::Now => commands::clock::now(),
        Commands::Calibrate(args) => commands::clock::calibrate(args),
        Commands::Format(args) => commands::format::run(args),
        Commands::Finish(args) => commands::finish::run(args),
        Commands::Init { shell } => commands::init::run(shell),
        Commands::Shell(args) => commands::shell::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

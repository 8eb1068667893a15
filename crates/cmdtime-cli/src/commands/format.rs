use clap::Args;
use cmdtime_core::{format_secs, Config, CoreError};

#[derive(Args)]
pub struct FormatArgs {
    /// Elapsed time in seconds, e.g. 10934.1
    #[arg(allow_negative_numbers = true)]
    pub seconds: f64,
    /// Fractional digits (default: precision from config)
    #[arg(long, short)]
    pub precision: Option<u8>,
    /// Print all fields as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: FormatArgs) -> Result<(), CoreError> {
    let precision = match args.precision {
        Some(p) => p,
        None => Config::load_or_default().settings().precision,
    };
    let formatted = format_secs(args.seconds, precision);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&formatted)?);
    } else {
        println!("{}", formatted.pretty);
    }
    Ok(())
}

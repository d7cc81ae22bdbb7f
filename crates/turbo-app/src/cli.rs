use clap::Parser;

/// Turbo: a native shell that drives page navigation through an embedded
/// web view.
#[derive(Parser, Debug)]
#[command(name = "turbo", version, about)]
pub struct Args {
    /// Location to open instead of `session.start_location`.
    pub url: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log filter override (e.g. `debug`, `turbo_session=trace`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

use clap::Parser;

/// pomobot, a voice-channel pomodoro chat bot.
#[derive(Parser, Debug)]
#[command(name = "pomobot", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

mod app;
mod cli;
mod commands;
mod keepalive;
mod notify;
mod store;
mod text;

use tracing_subscriber::EnvFilter;

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    // Try common locations for .env relative to the workspace
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root, two levels up from crates/pomobot-app/
        manifest_dir.join("..").join("..").join(".env"),
        // Current directory
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file before anything else
    load_dotenv();

    // Parse CLI arguments
    let args = cli::parse();

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or("pomobot=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "pomobot=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("pomobot v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load config
    let config = match &args.config {
        Some(path) => pomobot_config::load_config_from(std::path::Path::new(path)),
        None => pomobot_config::load_config(),
    };
    let config = config.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        pomobot_config::BotConfig::default()
    });

    // Refuse to start without credentials, like a missing login token.
    if config.bot.token.is_empty() {
        tracing::error!("no login token configured; set POMOBOT_TOKEN or [bot] token");
        std::process::exit(1);
    }
    if config.gateway.url.is_empty() {
        tracing::error!("no gateway url configured; set POMOBOT_GATEWAY_URL or [gateway] url");
        std::process::exit(1);
    }

    if let Err(e) = app::run(config).await {
        tracing::error!("fatal: {e}");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}

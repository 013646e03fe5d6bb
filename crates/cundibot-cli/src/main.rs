use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod admin;
mod chat;

use chat_core::Config;

#[derive(Parser, Debug)]
#[command(name = "cundibot")]
#[command(about = "Terminal client for CundiBot")]
#[command(version)]
struct Cli {
    /// Base URL of the answering service
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Base URL of the admin API
    #[arg(long, global = true)]
    admin_base: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat
    Chat,
    /// Send a single message in normal mode
    Send {
        /// Message content
        message: String,
    },
    /// Admin console operations
    Admin(admin::AdminArgs),
}

impl Cli {
    /// Flags win over environment and `config.toml`.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(api_base) = &self.api_base {
            config.api_base = chat_core::config::normalize_base_url(api_base);
        }
        if let Some(admin_base) = &self.admin_base {
            config.admin_base = chat_core::config::normalize_base_url(admin_base);
        }
    }
}

/// Log lines share the terminal with the chat, so only warnings show up
/// unless `--debug` or `RUST_LOG` asks for more.
fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn"
    }
}

fn init_tracing(debug: bool) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(debug))),
        )
        .with(
            fmt::layer()
                .with_target(debug)
                .with_line_number(debug)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = Config::load();
    cli.apply_overrides(&mut config);

    if cli.debug {
        eprintln!(
            "{}",
            format!("[DEBUG] Chat endpoint: {}", config.chat_url()).dimmed()
        );
        eprintln!(
            "{}",
            format!("[DEBUG] Admin base: {}", config.admin_base).dimmed()
        );
    }

    match cli.command {
        Commands::Chat => chat::run_interactive_chat(&config).await,
        Commands::Send { message } => chat::send_message(&config, &message).await,
        Commands::Admin(args) => admin::run(&config, args).await,
    }
}

//! `cundibot admin ...`: one authenticated admin call per invocation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use answer_client::{AdminClient, AdminError};
use chat_core::admin::{ConversationLog, CsvExport, StatsRange, UsageStats};
use chat_core::{ChatMode, Config};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::Colorize;

#[derive(Args, Debug)]
pub struct AdminArgs {
    /// Admin API key (falls back to CUNDIBOT_ADMIN_KEY / config.toml)
    #[arg(long, env = "CUNDIBOT_ADMIN_KEY", hide_env_values = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Usage statistics, optionally limited to a date range
    Stats {
        /// First day included (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day included (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Latest conversation logs
    Conversations,
    /// Download the conversation report as CSV
    ExportCsv {
        /// Directory the report is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Delete every conversation log
    ClearLogs {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Rotate the admin key
    ChangePassword {
        new_password: String,
    },
    /// Upload documents and rebuild the knowledge base
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn resolve_key(args_key: Option<String>, config: &Config) -> anyhow::Result<String> {
    args_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| config.admin_api_key.clone())
        .ok_or_else(|| anyhow::anyhow!("Por favor, ingresa una clave de API (--key)."))
}

pub async fn run(config: &Config, args: AdminArgs) -> anyhow::Result<()> {
    let key = resolve_key(args.key, config)?;
    let mut admin = AdminClient::new(config)?;

    let stats = admin.connect(&key).await.map_err(report)?;
    println!("{}", "✅ Conectado".green());

    match args.command {
        AdminCommand::Stats { from, to } => {
            let range = StatsRange {
                start: from,
                end: to,
            };
            let stats = if range.is_unbounded() {
                stats
            } else {
                admin.stats(&range).await.map_err(report)?
            };
            print_stats(&stats);
        }
        AdminCommand::Conversations => {
            let logs = admin.conversations().await.map_err(report)?;
            print_conversations(&logs);
        }
        AdminCommand::ExportCsv { out } => {
            let export = admin.export_csv().await.map_err(report)?;
            let path = write_export(&out, &export)?;
            println!(
                "{}",
                format!("📄 Reporte guardado en {}", path.display()).green()
            );
        }
        AdminCommand::ClearLogs { yes } => {
            if !yes && !confirm("¿Estás seguro de que quieres borrar TODO el historial de conversaciones? Esta acción no se puede deshacer.")? {
                println!("{}", "Operación cancelada.".yellow());
                return Ok(());
            }
            let response = admin.clear_logs().await.map_err(report)?;
            println!("{}", response.message.green());
        }
        AdminCommand::ChangePassword { new_password } => {
            let response = admin.change_password(&new_password).await.map_err(report)?;
            println!("{}", response.message.green());
            println!(
                "{}",
                "Vuelve a conectarte con la nueva clave.".yellow()
            );
        }
        AdminCommand::Upload { files } => {
            println!(
                "{}",
                format!("⏳ Subiendo {} archivo(s)...", files.len()).cyan()
            );
            let response = admin.upload_and_regenerate(&files).await.map_err(report)?;
            println!("{}", response.message.green());
            if let Some(details) = response.details {
                println!("{}", details.dimmed());
            }
        }
    }

    Ok(())
}

fn report(e: AdminError) -> anyhow::Error {
    if e.requires_reauth() {
        tracing::warn!("admin key rejected");
    }
    anyhow::Error::new(e)
}

fn confirm(question: &str) -> io::Result<bool> {
    print!("{} [s/N] ", question.yellow());
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}

/// Writes the report under `dir`, keeping only the file name the server
/// suggested.
fn write_export(dir: &Path, export: &CsvExport) -> io::Result<PathBuf> {
    let name = Path::new(&export.filename)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| chat_core::admin::DEFAULT_CSV_FILENAME.into());
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, &export.content)?;
    Ok(path)
}

fn print_stats(stats: &UsageStats) {
    println!("{}", "📊 Estadísticas".cyan().bold());
    println!("  Conversaciones totales: {}", stats.total_conversations);
    println!("  Tokens totales:         {}", stats.total_tokens);
    println!("  Costo total (USD):      ${}", stats.total_cost);
    println!(
        "  Modo normal:            {}",
        stats.mode_count(ChatMode::Normal)
    );
    println!(
        "  Modo tutor:             {}",
        stats.mode_count(ChatMode::Tutor)
    );
}

fn print_conversations(logs: &[ConversationLog]) {
    if logs.is_empty() {
        println!("{}", "No hay conversaciones registradas.".dimmed());
        return;
    }
    for log in logs {
        println!(
            "{} {} {}",
            log.short_conversation_id().dimmed(),
            log.timestamp.format("%Y-%m-%d %H:%M:%S"),
            format!("[{}]", log.mode).cyan()
        );
        println!("  {} {}", "P:".bold(), log.display_question());
        println!("  {} {}", "R:".bold(), log.answer_preview());
        if let Some(tokens) = log.total_tokens {
            println!("  {}", format!("tokens: {}", tokens).dimmed());
        }
        println!();
    }
}

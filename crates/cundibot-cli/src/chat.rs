//! Interactive chat loop and one-shot sends.

use std::io::{self, Write};

use answer_client::HttpAnswerClient;
use chat_core::{Config, Sender, TranscriptEntry};
use chat_state::{ChatController, TurnOutcome};
use colored::Colorize;

const TYPING: &str = "CundiBot está escribiendo...";

fn print_entry(entry: &TranscriptEntry) {
    match entry.sender {
        Sender::User => {}
        Sender::Bot => {
            println!("{}", "CundiBot:".green().bold());
            println!("{}", entry.text);
            println!();
        }
    }
}

fn show_typing() -> io::Result<()> {
    print!("{}", TYPING.dimmed());
    io::stdout().flush()
}

fn clear_typing() -> io::Result<()> {
    print!("\r{}\r", " ".repeat(TYPING.chars().count()));
    io::stdout().flush()
}

fn print_status(controller: &ChatController<HttpAnswerClient>) {
    let session = controller.session();
    let tutor = session.tutor_state();
    println!("{}", format!("Mode: {}", session.mode()).cyan());
    println!(
        "{}",
        format!(
            "Phase: {} ({})",
            tutor.phase.as_str(),
            tutor.phase.description()
        )
        .cyan()
    );
    if !tutor.topic.is_empty() {
        println!("{}", format!("Topic: {}", tutor.topic).cyan());
    }
    println!(
        "{}",
        format!("Completed questions: {}", tutor.current_index).cyan()
    );
    println!(
        "{}",
        format!("History entries: {}", session.history().len()).cyan()
    );
    println!(
        "{}",
        format!("Conversation ID: {}", session.conversation_id()).dimmed()
    );
}

fn print_help() {
    println!("{}", "Commands:".cyan().bold());
    println!("  /tutor   toggle tutor mode");
    println!("  /status  show mode and quiz progress");
    println!("  /help    show this help");
    println!("  exit     leave the chat");
}

pub async fn run_interactive_chat(config: &Config) -> anyhow::Result<()> {
    let mut controller = ChatController::new(HttpAnswerClient::new(config)?);

    println!("{}", "🤖 CundiBot".cyan().bold());
    println!(
        "{}",
        format!("Conversation ID: {}", controller.session().conversation_id()).dimmed()
    );
    println!(
        "{}",
        "Type /tutor to toggle tutor mode, /help for commands, 'exit' to leave".dimmed()
    );
    println!();

    loop {
        print!("{} ", "Tú:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("{}", "👋 ¡Hasta luego!".cyan());
            break;
        }

        match input {
            "" => continue,
            "/help" => {
                print_help();
                continue;
            }
            "/status" => {
                print_status(&controller);
                continue;
            }
            "/tutor" => {
                match controller.toggle_tutor_mode() {
                    Ok(_) => {
                        if let Some(entry) = controller.session().transcript().entries().last() {
                            print_entry(entry);
                        }
                    }
                    Err(e) => println!("{}", format!("❌ {}", e).red()),
                }
                continue;
            }
            _ => {}
        }

        let offset = controller.session().transcript().len();
        show_typing()?;
        let outcome = controller.handle_user_input(input).await;
        clear_typing()?;

        for entry in controller.session().transcript().since(offset) {
            print_entry(entry);
        }
        tracing::debug!(?outcome, "turn finished");
    }

    Ok(())
}

pub async fn send_message(config: &Config, message: &str) -> anyhow::Result<()> {
    let mut controller = ChatController::new(HttpAnswerClient::new(config)?);

    show_typing()?;
    let outcome = controller.handle_user_input(message).await;
    clear_typing()?;

    let answer = single_answer(outcome)?;
    println!("{}", answer);
    Ok(())
}

/// Failures are reported once, by whoever prints the returned error.
fn single_answer(outcome: TurnOutcome) -> anyhow::Result<String> {
    match outcome {
        TurnOutcome::Answered { answer, .. } => Ok(answer),
        TurnOutcome::Ignored => anyhow::bail!("message is empty"),
        TurnOutcome::Rejected(e) => Err(e.into()),
        TurnOutcome::Failed(e) => anyhow::bail!(chat_state::prompts::error_message(e.detail())),
    }
}

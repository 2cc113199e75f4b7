mod command;
mod helper;
mod printer;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use metis_application::{
    ChatSession, EditOutcome, GenerationCoordinator, GenerationOutcome, SendOutcome, Transcript,
};
use metis_core::project::AgentRole;
use metis_infrastructure::{ConfigService, MetisPaths, TomlConversationStore, TomlProjectRepository};

use crate::command::{COMMANDS, Command};
use crate::helper::CliHelper;
use crate::printer::{Chunk, Style, TranscriptPrinter};

/// Sends tracing output to `logs/metisium.log` so the REPL stays readable.
fn init_tracing(paths: &MetisPaths) -> Result<()> {
    let logs_dir = paths.logs_dir();
    fs::create_dir_all(&logs_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(logs_dir.join("metisium.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).init();
    Ok(())
}

fn print_chunks(chunks: &[Chunk]) {
    let mut stdout = std::io::stdout().lock();
    for chunk in chunks {
        let text = match chunk.style {
            Style::Header => chunk.text.bright_black().to_string(),
            Style::User => chunk.text.green().to_string(),
            Style::Speaker => chunk.text.bright_magenta().bold().to_string(),
            Style::Text => chunk.text.bright_blue().to_string(),
        };
        let _ = write!(stdout, "{text}");
    }
    let _ = stdout.flush();
}

/// Prints transcript changes as they happen.
fn spawn_transcript_printer(session: &ChatSession) {
    let mut transcript = session.subscribe_transcript();
    let mut responding = session.subscribe_responding();
    let mut printer = TranscriptPrinter::new(session.agents());

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = transcript.changed() => if changed.is_err() { break },
                changed = responding.changed() => if changed.is_err() { break },
            }
            let view = transcript.borrow_and_update().clone();
            let settled = !*responding.borrow_and_update();
            print_chunks(&printer.render(&view, settled, Instant::now()));
        }
    });
}

fn print_error(err: impl std::fmt::Display) {
    eprintln!("{}", format!("Error: {err}").red());
}

fn print_help() {
    println!("{}", "Type a message to talk to every agent through Metisium,".bright_black());
    println!("{}", "or address agents directly with @name or @everyone.".bright_black());
    for (_, usage) in COMMANDS {
        println!("  {}", usage.bright_cyan());
    }
    println!("  {}", "quit".bright_cyan());
}

fn describe(outcome: &GenerationOutcome) -> Option<String> {
    match outcome {
        GenerationOutcome::NoRecipients { .. } => {
            Some("No agent in this conversation matches those mentions.".to_string())
        }
        GenerationOutcome::Superseded { .. } | GenerationOutcome::Committed { .. } => None,
    }
}

async fn handle(session: &Arc<ChatSession>, command: Command) -> Result<()> {
    match command {
        Command::Send(text) => {
            if session.is_responding() {
                println!("{}", "Still responding; /stop to interrupt.".bright_black());
                return Ok(());
            }
            let session = Arc::clone(session);
            tokio::spawn(async move {
                match session.send_message(&text).await {
                    Ok(SendOutcome::Generated { outcome, .. }) => {
                        if let Some(note) = describe(&outcome) {
                            println!("{}", note.bright_black());
                        }
                    }
                    Ok(SendOutcome::Ignored) => {}
                    Err(err) => print_error(err),
                }
            });
        }
        Command::Edit { message_id, text } => {
            let session = Arc::clone(session);
            tokio::spawn(async move {
                match session.edit_message(&message_id, &text).await {
                    Ok(EditOutcome::MissingTarget) => {
                        println!("{}", format!("No user message '{message_id}' here.").bright_black());
                    }
                    Ok(EditOutcome::Regenerated { outcome, .. }) => {
                        if let Some(note) = describe(&outcome) {
                            println!("{}", note.bright_black());
                        }
                    }
                    Err(err) => print_error(err),
                }
            });
        }
        Command::Stop => session.stop_generation(),
        Command::History => {
            for message in session.transcript().snapshot().messages {
                println!(
                    "{} {} {}",
                    message.id.bright_black(),
                    format!("[{}]", message.sender_id).bright_magenta(),
                    message.text
                );
            }
        }
        Command::Chats => {
            let active = session.active_context().await.map(|c| c.conversation_id);
            for chat in session.chats().await {
                let marker = if active.as_deref() == Some(chat.id.as_str()) { "*" } else { " " };
                println!("{marker} {} {}", chat.id.bright_cyan(), chat.title);
            }
        }
        Command::Open(chat_id) => session.open_chat(&chat_id).await?,
        Command::New => {
            session.new_chat().await;
            println!("{}", "New chat: your next message starts it.".bright_black());
        }
        Command::Rename { chat_id, title } => session.rename_chat(&chat_id, &title).await?,
        Command::Projects => {
            for project in session.projects().await? {
                println!("{} {}", project.id.bright_cyan(), project.name.bold());
                for role in &project.roles {
                    println!("    {}: {}", role.agent_id, role.role.bright_black());
                }
                for sub in &project.sub_conversations {
                    println!("    {} {}", sub.id.bright_cyan(), sub.title);
                }
            }
        }
        Command::Project {
            project_id,
            sub_conversation_id,
        } => {
            session
                .open_project_thread(&project_id, sub_conversation_id.as_deref())
                .await?
        }
        Command::NewProject { agent_ids, name } => {
            let project = session.create_project(&name, &agent_ids).await?;
            println!(
                "{}",
                format!("Created {} ({}).", project.name, project.id).green()
            );
        }
        Command::AddAgents {
            project_id,
            agent_ids,
        } => {
            session.add_agents_to_project(&project_id, &agent_ids).await?;
        }
        Command::Role {
            project_id,
            agent_id,
            role,
        } => {
            let project = session
                .projects()
                .await?
                .into_iter()
                .find(|p| p.id == project_id)
                .ok_or_else(|| anyhow::anyhow!("project '{project_id}' not found"))?;
            let mut roles: Vec<AgentRole> = project
                .roles
                .into_iter()
                .filter(|r| r.agent_id != agent_id)
                .collect();
            roles.push(AgentRole::new(agent_id, role));
            session.set_project_roles(&project_id, roles).await?;
        }
        Command::Help => print_help(),
        Command::Usage(usage) => println!("{}", format!("Usage: {usage}").yellow()),
        Command::Unknown(name) => println!("{}", format!("Unknown command {name}").bright_black()),
        Command::Quit => {}
    }
    Ok(())
}

/// Entry point of the Metisium REPL.
///
/// Builds the engine over the TOML stores in the config directory, prints
/// transcript updates from a background task, and reads commands until
/// `quit`.
#[tokio::main]
async fn main() -> Result<()> {
    // ===== Backend Initialization =====
    let paths = MetisPaths::new(None)?;
    init_tracing(&paths)?;

    let config = ConfigService::new(paths.clone()).get_config();
    let store = Arc::new(TomlConversationStore::new(paths.conversations_dir())?);
    store.seed_missing().await?;
    let projects = Arc::new(TomlProjectRepository::open(paths.projects_file())?);
    let model = metis_interaction::model_from_config(&config.model);

    let coordinator = GenerationCoordinator::new(store.clone(), model, Arc::new(Transcript::new()))
        .with_engine(config.engine.clone());
    let session = Arc::new(ChatSession::new(Arc::new(coordinator), store, projects));
    spawn_transcript_printer(&session);

    tracing::info!(base_dir = ?paths.base_dir(), "metisium started");

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Metisium ===".bright_magenta().bold());
    println!("{}", "Type '/help' for commands, or 'quit' to exit.".bright_black());
    println!();

    // ===== Main REPL Loop =====
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                session.stop_generation();
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                print_error(err);
                break;
            }
        };

        let Some(command) = command::parse(&line) else {
            continue;
        };
        let _ = rl.add_history_entry(line.trim());

        if command == Command::Quit {
            break;
        }
        if let Command::Send(text) = &command {
            println!("{}", format!("> {text}").green());
        }
        if let Err(err) = handle(&session, command).await {
            print_error(err);
        }
    }

    session.stop_generation();
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

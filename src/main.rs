//! learngap — tutor entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > env > config)
//!   4. Init logger once
//!   5. Build the completion provider (missing credential is fatal)
//!   6. Open the session store on the persisted history
//!   7. `-q`: answer one question and exit
//!   8. Otherwise spawn Ctrl-C → shutdown watcher and run the console

use tokio_util::sync::CancellationToken;
use tracing::info;

use learngap::config::{self, Config};
use learngap::error::AppError;
use learngap::llm::{providers, LlmProvider};
use learngap::logger;
use learngap::subsystems::comms;
use learngap::subsystems::memory::{PersistedLog, SessionStore};
use learngap::subsystems::tutor::commands::Command;
use learngap::subsystems::tutor::{Reply, Tutor};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    let force_cli_level = args.log_level.is_some();

    logger::init(effective_log_level, force_cli_level, config.log_file.as_deref())?;

    info!(
        app_name = %config.app_name,
        work_dir = %config.work_dir.display(),
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        provider = %config.llm.provider,
        "config loaded"
    );

    let provider = providers::from_config(&config)?;

    let store = SessionStore::open(PersistedLog::new(&config.tutor.history_file));
    let mut tutor = Tutor::new(&config, provider, store);

    if let Some(question) = args.question {
        return ask_once(&mut tutor, question).await;
    }

    // Shared shutdown token — Ctrl-C cancels it, the console watches it.
    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received — initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    print_startup_summary(&config, &tutor);

    comms::run_console(&mut tutor, shutdown.clone()).await?;
    shutdown.cancel();

    {
        use std::io::Write as _;
        println!("\nBye :) ...");
        let _ = std::io::stdout().flush();
    }
    Ok(())
}

/// `-q`: print the answer on stdout; any other outcome goes to stderr with exit code 1.
async fn ask_once(tutor: &mut Tutor, question: String) -> Result<(), AppError> {
    match tutor.handle(Command::Ask(question)).await {
        Reply::Answer(text) => {
            println!("{text}");
            Ok(())
        }
        other => {
            eprintln!("{}", comms::render(&other));
            std::process::exit(1);
        }
    }
}

fn print_startup_summary(config: &Config, tutor: &Tutor) {
    let fit = |text: String| -> String {
        const WIDTH: usize = 58;
        let char_count = text.chars().count();
        if char_count >= WIDTH {
            let mut out = text.chars().take(WIDTH - 1).collect::<String>();
            out.push('…');
            out
        } else {
            format!("{text:<WIDTH$}")
        }
    };

    let session = tutor.session();
    let store = &session.store;
    let llm_line = match (tutor.provider(), config.llm.active_endpoint()) {
        (LlmProvider::Dummy(_), _) | (_, None) => "dummy (offline echo)".to_string(),
        (p, Some(ep)) => format!(
            "{} temp={} timeout={}s",
            p.describe(),
            ep.temperature,
            ep.timeout_seconds
        ),
    };
    let selection_line = format!(
        "{} · {} · {}",
        session.selection.subject, session.selection.depth, session.selection.style
    );
    let topic_line = session.topic.as_deref().unwrap_or("(none)").to_string();
    let history_line = format!(
        "{} records · {}",
        store.persisted().len(),
        store.persisted().path().display()
    );

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ 📚 {:<58}║", fit(config.app_name.clone()));
    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ 🆔 Session: {:<49}║", store.session_id());
    println!("║ 🧠 PID: {:<53}║", std::process::id());
    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ 🤖 LLM                                                       ║");
    println!("║   {}║", fit(llm_line));
    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ 🎯 Selections                                                ║");
    println!("║   {}║", fit(selection_line));
    println!("║   {}║", fit(format!("topic: {topic_line}")));
    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ 🗂️  Storage                                                  ║");
    println!("║   {}║", fit(format!("history: {history_line}")));
    println!("║   {}║", fit(format!("exports: {}", config.export.dir.display())));
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!("💡 Type a question, or /help for commands");
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
    question: Option<String>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;
    let mut question = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: learngap [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("  -q, --question <TEXT>      Ask one question, print the answer and exit");
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "-q" | "--question" => {
                if let Some(text) = iter.next() {
                    question = Some(text);
                } else {
                    eprintln!("error: -q/--question requires a question");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            other => {
                eprintln!("error: unexpected argument '{other}' (see --help)");
                std::process::exit(1);
            }
        }
    }

    // Each -v raises verbosity one tier:
    //   -v      → warn
    //   -vv     → info
    //   -vvv    → debug
    //   -vvvv+  → trace
    let log_level = match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    };

    CliArgs { log_level, config_path, question }
}

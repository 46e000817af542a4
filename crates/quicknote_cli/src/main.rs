//! CLI entry point for quick local checks of `quicknote_core`.
//!
//! # Responsibility
//! - Verify core crate linkage (`ping`, `version`).
//! - Run word statistics on ad-hoc text and a create/list/stats round trip
//!   against the configured database.

use clap::{Parser, Subcommand};
use quicknote_core::{
    analyze_word_frequency, init_logging_from_config, CoreConfig, NoteRequest, NoteService,
    NoteTag, NotesApi, SqliteNoteStore,
};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "quicknote_cli")]
#[command(about = "Local checks for the quicknote core crate", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the core crate is linked
    Ping,
    /// Print the core crate version
    Version,
    /// Count words of the given text, most frequent first
    Stats {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Create, list and analyze a note in the configured database
    Demo,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ping => {
            println!("quicknote_core ping={}", quicknote_core::ping());
            Ok(())
        }
        Command::Version => {
            println!("quicknote_core version={}", quicknote_core::core_version());
            Ok(())
        }
        Command::Stats { text } => {
            for line in stats_lines(&text.join(" ")) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Demo => run_demo(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn stats_lines(text: &str) -> Vec<String> {
    let entries = analyze_word_frequency(text).into_entries();
    if entries.is_empty() {
        return vec!["(no words)".to_string()];
    }
    entries
        .into_iter()
        .map(|(word, count)| format!("{count:>6} {word}"))
        .collect()
}

fn run_demo() -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    init_logging_from_config(&config)?;

    let store = SqliteNoteStore::open(&config.db_path).map_err(|err| err.to_string())?;
    let api = NotesApi::new(NoteService::with_config(store, config.service));

    let created = api
        .create(
            NoteRequest::new("Demo", "Rust is fast, rust is safe!")
                .with_tags([NoteTag::Personal]),
        )
        .map_err(|err| err.message)?;
    println!("created id={} title={}", created.id, created.title);

    let page = api
        .list(&[], Some(0), None)
        .map_err(|err| err.message)?;
    println!(
        "listed {} of {} note(s) in {}",
        page.number_of_elements,
        page.total_elements,
        config.db_path.display()
    );

    let stats = api.stats(&created.id).map_err(|err| err.message)?;
    for (word, count) in stats.iter() {
        println!("{count:>6} {word}");
    }
    Ok(())
}

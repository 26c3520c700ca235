//*** START FILE: src/main.rs ***//
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use bitext_align_gui::config::{load_config_from_file, Config};
use bitext_align_gui::storage::{
    export_sessions_to_file, import_sessions_from_file, FileStore, SessionRepository,
};
use bitext_align_gui::{AppError, Result};
use clap::{Parser, Subcommand};
use eframe::{egui, NativeOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bitext-align", version, about = "Side-by-side bilingual text alignment editor")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `data_dir` from the configuration.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print saved sessions, newest first.
    List,
    /// Write every saved session to a JSON backup file.
    Export { path: PathBuf },
    /// Merge sessions from a JSON backup file, skipping known ids.
    Import { path: PathBuf },
    /// Delete a saved session by id.
    Delete { id: i64 },
}

fn run_command(command: Command, data_dir: PathBuf) -> Result<()> {
    let mut repository = SessionRepository::new(FileStore::new(data_dir));
    match command {
        Command::List => {
            let sessions = repository.list_newest_first()?;
            if sessions.is_empty() {
                println!("No saved sessions.");
            }
            for session in sessions {
                println!(
                    "{}\t{}\t{} ({} / {} segments)",
                    session.id,
                    session.date,
                    session.title,
                    session.data.track_a.len(),
                    session.data.track_b.len()
                );
            }
        }
        Command::Export { path } => {
            let count = export_sessions_to_file(&repository, &path)?;
            println!("Exported {} session(s) to {}", count, path.display());
        }
        Command::Import { path } => {
            let report = import_sessions_from_file(&mut repository, &path)?;
            if report.added > 0 {
                println!("{} new session(s) imported!", report.added);
            } else {
                println!("No new sessions found in the file to import.");
            }
        }
        Command::Delete { id } => {
            if repository.delete(id)? {
                println!("Deleted session {}", id);
            } else {
                return Err(AppError::SessionNotFound(id));
            }
        }
    }
    Ok(())
}

fn run_gui(config: Config, data_dir: PathBuf) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Bitext Align",
        options,
        Box::new(move |cc| Box::new(app::BitextApp::new(cc, config, data_dir))),
    )?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config_from_file(&cli.config)?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data_dir.clone());
    log::debug!("using data directory {}", data_dir.display());

    match cli.command {
        Some(command) => run_command(command, data_dir),
        None => run_gui(config, data_dir),
    }
}
//*** END FILE: src/main.rs ***//

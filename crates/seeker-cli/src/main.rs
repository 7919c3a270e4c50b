//! `seeker` - command-line host for SeekerNotes `.snt` files.
//!
//! # Usage
//!
//! ```bash
//! seeker to-html notes/ideas.snt
//! seeker from-html clipboard.html --font retro > ideas.snt
//! seeker normalize --write notes/ideas.snt
//! seeker config --set-dir ~/notes
//! seeker list
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see converter and store diagnostics.

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{CliArgs, Command};
use seeker_core::{html_to_snt, parse_note, snt_to_html};
use seeker_core_store::{ConfigStore, NotesDir, load_note};
use std::{fs, path::Path};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match args.command {
        Command::ToHtml { file } => {
            let note = load_note(&file)
                .with_context(|| format!("failed to load {}", file.display()))?;
            println!("{}", snt_to_html(&note.content));
        }
        Command::FromHtml { file, font } => {
            let html = read(&file)?;
            println!("{}", html_to_snt(&html, font));
        }
        Command::Normalize { file, write } => normalize(&file, write)?,
        Command::List { dir } => list(dir.as_deref())?,
        Command::Config { set_dir, theme } => {
            let store = ConfigStore::default_location()?;
            let mut config = store.load().context("failed to load config")?;

            if set_dir.is_some() || theme.is_some() {
                if let Some(dir) = set_dir {
                    let dir = NotesDir::open(&dir)?;
                    config.user_selected_directory = dir.root().display().to_string();
                }
                if theme.is_some() {
                    config.theme = theme;
                }
                store.save(&config).context("failed to save config")?;
                tracing::info!(path = %store.path().display(), "config updated");
            }

            println!("config: {}", store.path().display());
            println!("notes directory: {}", config.user_selected_directory);
            println!("theme: {}", config.theme.as_deref().unwrap_or("default"));
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn normalize(file: &Path, write: bool) -> Result<()> {
    let note = parse_note(&read(file)?);
    let snt = note.to_snt();
    if write {
        fs::write(file, &snt).with_context(|| format!("failed to write {}", file.display()))?;
        tracing::debug!(path = %file.display(), font = %note.font, "normalized");
    } else {
        println!("{}", snt);
    }
    Ok(())
}

fn list(dir: Option<&Path>) -> Result<()> {
    let notes_dir = match dir {
        Some(dir) => NotesDir::open(dir)?,
        None => {
            let config = ConfigStore::default_location()?.load()?;
            if !config.is_user_dir_valid() {
                bail!("no notes directory configured; run `seeker config --set-dir <DIR>`");
            }
            config.notes_dir()?
        }
    };

    for note in notes_dir.load_all()? {
        let parsed = note.parse();
        let first_line = parsed.document.plain_text();
        let first_line = first_line.lines().next().unwrap_or_default();
        println!("{}\t{}\t{}", note.name, parsed.font, first_line);
    }
    Ok(())
}

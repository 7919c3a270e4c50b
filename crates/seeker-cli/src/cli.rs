//! Command-line argument parsing for `seeker`.

use clap::{Parser, Subcommand};
use seeker_core::FontChoice;
use std::path::PathBuf;

/// Convert and manage SeekerNotes `.snt` files
#[derive(Parser, Debug)]
#[command(name = "seeker", version, about = "Convert and manage SeekerNotes .snt files")]
pub struct CliArgs {
    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print a .snt file as editable HTML
    ToHtml {
        /// The .snt file to read
        file: PathBuf,
    },

    /// Print the SNT form of an HTML fragment
    FromHtml {
        /// The HTML file to read
        file: PathBuf,

        /// Font directive to write (normal, retro, stylish)
        #[arg(long, default_value_t = FontChoice::Normal)]
        font: FontChoice,
    },

    /// Re-serialize a .snt file in canonical form
    Normalize {
        /// The .snt file to normalize
        file: PathBuf,

        /// Overwrite the file instead of printing
        #[arg(short = 'w', long)]
        write: bool,
    },

    /// List the notes in a directory
    List {
        /// Directory to list (defaults to the configured one)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show or update the configuration
    Config {
        /// Set the notes directory
        #[arg(long, value_name = "DIR")]
        set_dir: Option<PathBuf>,

        /// Set the UI theme
        #[arg(long, value_name = "NAME")]
        theme: Option<String>,
    },
}

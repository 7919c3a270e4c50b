#![warn(missing_docs)]
//! `seeker-core-store` - configuration and note storage for `seeker-core`.
//!
//! The core converter and style engine never touch the filesystem. This crate is the
//! persistence side: `config.json` holding the selected notes directory, and a directory of
//! `.snt` files loaded into [`NoteFile`]s for the note list.
//!
//! ```no_run
//! use seeker_core_store::{ConfigStore, StoreError};
//!
//! fn list_notes() -> Result<(), StoreError> {
//!     let config = ConfigStore::default_location()?.load()?;
//!     for note in config.notes_dir()?.load_all()? {
//!         println!("{}", note.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
mod error;
pub mod notes;

pub use config::{APP_DIR, CONFIG_FILE_NAME, Config, ConfigStore, config_dir};
pub use error::StoreError;
pub use notes::{
    NEW_NOTE_NAME, NoteFile, NotesDir, OperationResult, SNT_EXTENSION, create_new_note,
    load_note, update_file_list,
};

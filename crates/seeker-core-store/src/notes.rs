//! Notes on disk and the in-memory note list.

use crate::error::StoreError;
use seeker_core::{SntNote, parse_note, snt_to_html};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Name given to fresh, unnamed notes. Notes with this name are never auto-saved.
pub const NEW_NOTE_NAME: &str = "New Note";

/// File extension of note files.
pub const SNT_EXTENSION: &str = "snt";

/// A note as shown in the file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFile {
    /// Display name (file name without `.snt`).
    pub name: String,
    /// Raw SNT content.
    pub content: String,
    /// Where the note was loaded from, if anywhere.
    pub file_path: Option<PathBuf>,
    /// `false` when `content` has unsaved changes.
    pub is_saved: bool,
    /// Content as last loaded or saved.
    pub original_content: String,
}

impl NoteFile {
    /// An empty, saved note called `name`.
    pub fn new_note(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: String::new(),
            file_path: None,
            is_saved: true,
            original_content: String::new(),
        }
    }

    /// Whether saving this note writes to disk.
    pub fn is_auto_saveable(&self) -> bool {
        self.name != NEW_NOTE_NAME
    }

    /// Replace the content, tracking whether it differs from the saved version.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.is_saved = self.content == self.original_content;
    }

    /// Parse the content.
    pub fn parse(&self) -> SntNote {
        parse_note(&self.content)
    }

    /// Render the content as editable HTML.
    pub fn to_html(&self) -> String {
        snt_to_html(&self.content)
    }
}

/// A fresh [`NEW_NOTE_NAME`] note.
pub fn create_new_note() -> NoteFile {
    NoteFile::new_note(NEW_NOTE_NAME)
}

/// Insert `note` into `files`, replacing the note with the same name if there is one.
///
/// Returns the index the note ended up at.
pub fn update_file_list(files: &mut Vec<NoteFile>, note: NoteFile) -> usize {
    match files.iter().position(|existing| existing.name == note.name) {
        Some(index) => {
            files[index] = note;
            index
        }
        None => {
            files.push(note);
            files.len() - 1
        }
    }
}

/// Load one `.snt` file.
pub fn load_note(path: &Path) -> Result<NoteFile, StoreError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(SNT_EXTENSION) {
        return Err(StoreError::InvalidExtension(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(NoteFile {
        name,
        original_content: content.clone(),
        content,
        file_path: Some(path.to_path_buf()),
        is_saved: true,
    })
}

/// A directory of `.snt` notes.
#[derive(Debug, Clone)]
pub struct NotesDir {
    root: PathBuf,
}

impl NotesDir {
    /// Open `root`, which must be an existing directory other than `/`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() || root == Path::new("/") || !root.is_dir() {
            return Err(StoreError::InvalidDirectory(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a note called `name` is saved to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, SNT_EXTENSION))
    }

    /// Load every note in the directory, sorted by name.
    ///
    /// Entries that are not readable `.snt` files are logged and skipped.
    pub fn load_all(&self) -> Result<Vec<NoteFile>, StoreError> {
        let mut notes = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    warn!(%err, "skipping unreadable directory entry");
                    continue;
                }
            };
            match load_note(&path) {
                Ok(note) => notes.push(note),
                Err(err) => warn!(path = %path.display(), %err, "skipping note"),
            }
        }
        notes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(notes)
    }

    /// Write `content` to `<name>.snt`, returning the path written.
    pub fn save(&self, name: &str, content: &str) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name);
        fs::write(&path, content)?;
        debug!(path = %path.display(), "saved note");
        Ok(path)
    }

    /// Save `note` with new `content` and mark it saved.
    ///
    /// [`NEW_NOTE_NAME`] notes are left untouched; `Ok(None)` is returned for them.
    pub fn save_note(
        &self,
        note: &mut NoteFile,
        content: &str,
    ) -> Result<Option<PathBuf>, StoreError> {
        if !note.is_auto_saveable() {
            debug!(name = %note.name, "not saving unnamed note");
            return Ok(None);
        }

        let path = match &note.file_path {
            Some(path) => {
                fs::write(path, content)?;
                path.clone()
            }
            None => self.save(&note.name, content)?,
        };
        note.content = content.to_string();
        note.original_content = content.to_string();
        note.file_path = Some(path.clone());
        note.is_saved = true;
        Ok(Some(path))
    }
}

/// Outcome of a persistence operation in the shape UI callers consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    /// A successful result.
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failed result carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, StoreError>> for OperationResult {
    fn from(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}

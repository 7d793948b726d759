use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] dump_core::ApiError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("{0}")]
    Onboarding(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error(
        "Profile '{0}' is not signed in. Run `dump auth login` or set DUMP_ID_TOKEN."
    )]
    NotSignedIn(String),
}

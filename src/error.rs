//! Error type shared by the store, the gallery roles and the UI.
//!
//! The user-facing variants carry the exact inline message shown on screen,
//! so the UI can render `error.to_string()` directly.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Invalid password. Please try again.")]
    InvalidPassword,

    #[error("Invalid access code. Please check and try again.")]
    InvalidAccessCode,

    #[error("Please select files and enter an access code.")]
    MissingUploadInput,

    #[error("Admin session required. Please log in again.")]
    NotAuthenticated,

    /// A selected file could not be read.
    #[error("Error uploading files. Please try again.")]
    Encode {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} is not a supported image file")]
    UnsupportedImage { name: String },

    #[error("Stored image data is unreadable: {0}")]
    Decode(String),

    #[error("Gallery {code} is corrupt: {source}")]
    CorruptCollection {
        code: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("UI error: {0}")]
    Ui(#[from] iced::Error),
}

pub type Result<T> = std::result::Result<T, GalleryError>;

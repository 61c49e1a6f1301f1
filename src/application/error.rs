use thiserror::Error;

use crate::domain::{ClassifyError, ComposeError, DocumentError, DocumentId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("Stored file for document {id} is missing: {path}")]
    DocumentFileMissing { id: DocumentId, path: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(#[from] DocumentError),

    #[error("Malformed ledger input: {0}")]
    MalformedInput(#[from] ClassifyError),

    #[error("Statement arithmetic failed: {0}")]
    Arithmetic(#[from] ComposeError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(anyhow::Error),
}

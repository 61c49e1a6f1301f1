use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DocumentId = Uuid;

/// File extensions the ledger reader accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Voucher,
    Invoice,
    Contract,
    Letter,
    Report,
    Ledger,
    Other,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Voucher => "voucher",
            DocumentKind::Invoice => "invoice",
            DocumentKind::Contract => "contract",
            DocumentKind::Letter => "letter",
            DocumentKind::Report => "report",
            DocumentKind::Ledger => "ledger",
            DocumentKind::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "voucher" => Some(DocumentKind::Voucher),
            "invoice" => Some(DocumentKind::Invoice),
            "contract" => Some(DocumentKind::Contract),
            "letter" => Some(DocumentKind::Letter),
            "report" => Some(DocumentKind::Report),
            "ledger" => Some(DocumentKind::Ledger),
            "other" => Some(DocumentKind::Other),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered ledger spreadsheet: metadata in the database, bytes on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub kind: DocumentKind,
    pub extension: String,
    pub file_path: String,
    pub size_kb: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn new(title: String, kind: DocumentKind, file_path: String, size_kb: i64) -> Self {
        let extension = extension_of(&file_path).unwrap_or_default();
        Self {
            id: Uuid::new_v4(),
            title,
            kind,
            extension,
            file_path,
            size_kb,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.title.trim().is_empty() {
            return Err(DocumentError::BlankTitle);
        }
        if self.file_path.trim().is_empty() {
            return Err(DocumentError::BlankPath);
        }
        if !is_supported_extension(&self.extension) {
            return Err(DocumentError::UnsupportedExtension(self.extension.clone()));
        }
        Ok(())
    }
}

/// Lowercased dotted extension of a path, e.g. ".xlsx".
pub fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

pub fn is_supported_extension(extension: &str) -> bool {
    let extension = extension.to_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| *supported == extension)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    BlankTitle,
    BlankPath,
    UnsupportedExtension(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::BlankTitle => write!(f, "document title cannot be blank"),
            DocumentError::BlankPath => write!(f, "document file path cannot be blank"),
            DocumentError::UnsupportedExtension(ext) => {
                write!(f, "unsupported file extension '{}', expected .xlsx or .xls", ext)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_roundtrip() {
        for kind in [
            DocumentKind::Voucher,
            DocumentKind::Invoice,
            DocumentKind::Contract,
            DocumentKind::Letter,
            DocumentKind::Report,
            DocumentKind::Ledger,
            DocumentKind::Other,
        ] {
            assert_eq!(DocumentKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(DocumentKind::from_str("spreadsheet"), None);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("ledger.xlsx"), Some(".xlsx".to_string()));
        assert_eq!(extension_of("LEDGER.XLSX"), Some(".xlsx".to_string()));
        assert_eq!(extension_of("/data/books/q1.xls"), Some(".xls".to_string()));
        assert_eq!(extension_of("no_extension"), None);
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension(".xlsx"));
        assert!(is_supported_extension(".xls"));
        assert!(is_supported_extension(".XLSX"));
        assert!(!is_supported_extension(".csv"));
        assert!(!is_supported_extension(""));
    }

    #[test]
    fn test_validate_blank_title() {
        let doc = Document::new("  ".to_string(), DocumentKind::Ledger, "a.xlsx".to_string(), 4);
        assert_eq!(doc.validate(), Err(DocumentError::BlankTitle));
    }

    #[test]
    fn test_validate_blank_path() {
        let doc = Document::new("دفتر کل".to_string(), DocumentKind::Ledger, "".to_string(), 4);
        assert_eq!(doc.validate(), Err(DocumentError::BlankPath));
    }

    #[test]
    fn test_validate_unsupported_extension() {
        let doc = Document::new(
            "دفتر کل".to_string(),
            DocumentKind::Ledger,
            "ledger.csv".to_string(),
            4,
        );
        assert_eq!(
            doc.validate(),
            Err(DocumentError::UnsupportedExtension(".csv".to_string()))
        );
    }

    #[test]
    fn test_validate_accepts_xls() {
        let doc = Document::new(
            "دفتر کل".to_string(),
            DocumentKind::Ledger,
            "ledger.xls".to_string(),
            4,
        );
        assert!(doc.validate().is_ok());
        assert_eq!(doc.extension, ".xls");
    }
}

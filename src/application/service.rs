use std::path::Path;

use chrono::Local;
use log::{debug, info};

use crate::domain::{
    classify, extension_of, is_supported_extension, Document, DocumentError, DocumentId,
    DocumentKind, FinancialStatement, Worksheet,
};
use crate::io::{read_ledger_bytes, read_ledger_file, write_statement_csv, write_statement_xlsx};
use crate::storage::Repository;

use super::AppError;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Prefix every generated artifact filename starts with.
pub const ARTIFACT_PREFIX: &str = "صورت_مالی_";

/// Output format for a generated statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Xlsx,
    Csv,
}

impl StatementFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            StatementFormat::Xlsx => "xlsx",
            StatementFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            StatementFormat::Xlsx => XLSX_CONTENT_TYPE,
            StatementFormat::Csv => CSV_CONTENT_TYPE,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "xlsx" => Some(StatementFormat::Xlsx),
            "csv" => Some(StatementFormat::Csv),
            _ => None,
        }
    }
}

/// A rendered statement ready to hand to a caller: serialized bytes plus the
/// download metadata and the figures it was rendered from.
pub struct StatementArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub statement: FinancialStatement,
}

/// Application service providing high-level operations for the statement
/// generator. This is the primary interface for any client (CLI, API, etc.).
pub struct StatementService {
    repo: Repository,
}

impl StatementService {
    /// Create a new statement service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Document registry
    // ========================

    /// Register a ledger spreadsheet that already lives on disk.
    pub async fn register_document(
        &self,
        title: String,
        kind: DocumentKind,
        file_path: String,
    ) -> Result<Document, AppError> {
        let size_kb = file_size_kb(&file_path)?;
        let document = Document::new(title, kind, file_path, size_kb);
        document.validate()?;

        self.repo.save_document(&document).await?;
        info!("Registered document {} ({})", document.id, document.title);
        Ok(document)
    }

    /// Fetch a document by id.
    pub async fn get_document(&self, id: DocumentId) -> Result<Document, AppError> {
        self.repo
            .get_document(id)
            .await?
            .ok_or(AppError::DocumentNotFound(id))
    }

    /// List all registered documents, newest first.
    pub async fn list_documents(&self) -> Result<Vec<Document>, AppError> {
        Ok(self.repo.list_documents().await?)
    }

    /// Remove a document's registry entry. The file on disk is untouched.
    pub async fn remove_document(&self, id: DocumentId) -> Result<Document, AppError> {
        let document = self.get_document(id).await?;
        self.repo.delete_document(id).await?;
        info!("Removed document {} ({})", document.id, document.title);
        Ok(document)
    }

    // ========================
    // Statement generation
    // ========================

    /// Generate a statement from a registered document's stored file.
    pub async fn generate_for_document(
        &self,
        id: DocumentId,
        format: StatementFormat,
    ) -> Result<StatementArtifact, AppError> {
        let document = self.get_document(id).await?;
        if !Path::new(&document.file_path).exists() {
            return Err(AppError::DocumentFileMissing {
                id,
                path: document.file_path,
            });
        }

        let sheet =
            read_ledger_file(Path::new(&document.file_path)).map_err(AppError::Unexpected)?;
        let statement = compose_statement(&sheet)?;
        let filename = artifact_filename(&id.simple().to_string(), format);
        let artifact = render(statement, filename, format)?;
        info!(
            "Generated {} statement for document {}: {}",
            format.extension(),
            id,
            artifact.filename
        );
        Ok(artifact)
    }
}

/// Generate a statement straight from in-memory spreadsheet bytes.
/// `source_name` is the uploaded filename; its extension gates admission and
/// its stem seeds the artifact filename.
pub fn generate_from_bytes(
    bytes: &[u8],
    source_name: &str,
    format: StatementFormat,
) -> Result<StatementArtifact, AppError> {
    let extension = extension_of(source_name).unwrap_or_default();
    if !is_supported_extension(&extension) {
        return Err(DocumentError::UnsupportedExtension(extension).into());
    }

    let sheet = read_ledger_bytes(bytes).map_err(AppError::Unexpected)?;
    debug!("Read {} rows from {}", sheet.rows.len(), source_name);
    let statement = compose_statement(&sheet)?;
    let filename = artifact_filename(file_stem(source_name), format);
    render(statement, filename, format)
}

/// Generate a statement from a spreadsheet file on disk, no registry involved.
pub fn generate_from_path(
    path: &Path,
    format: StatementFormat,
) -> Result<StatementArtifact, AppError> {
    if !path.exists() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let extension = extension_of(name).unwrap_or_default();
    if !is_supported_extension(&extension) {
        return Err(DocumentError::UnsupportedExtension(extension).into());
    }

    let sheet = read_ledger_file(path).map_err(AppError::Unexpected)?;
    let statement = compose_statement(&sheet)?;
    let filename = artifact_filename(file_stem(name), format);
    render(statement, filename, format)
}

fn compose_statement(sheet: &Worksheet) -> Result<FinancialStatement, AppError> {
    let totals = classify(sheet)?;
    Ok(FinancialStatement::compose(totals)?)
}

fn render(
    statement: FinancialStatement,
    filename: String,
    format: StatementFormat,
) -> Result<StatementArtifact, AppError> {
    let table = statement.to_table();
    let bytes = match format {
        StatementFormat::Xlsx => write_statement_xlsx(&table).map_err(AppError::Unexpected)?,
        StatementFormat::Csv => {
            let mut buffer = Vec::new();
            write_statement_csv(&table, &mut buffer).map_err(AppError::Unexpected)?;
            buffer
        }
    };

    Ok(StatementArtifact {
        filename,
        content_type: format.content_type(),
        bytes,
        statement,
    })
}

/// "صورت_مالی_" + source stem + local timestamp + format extension.
fn artifact_filename(stem: &str, format: StatementFormat) -> String {
    format!(
        "{}{}_{}.{}",
        ARTIFACT_PREFIX,
        stem,
        Local::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
}

fn file_size_kb(path: &str) -> Result<i64, AppError> {
    let metadata =
        std::fs::metadata(path).map_err(|_| AppError::FileNotFound(path.to_string()))?;
    Ok((metadata.len() / 1024) as i64)
}

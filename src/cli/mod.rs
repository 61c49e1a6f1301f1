use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{generate_from_path, StatementFormat, StatementService};
use crate::domain::{Document, DocumentId, DocumentKind, FinancialStatement};

/// Daftar - Smart Financial Statement Generator
#[derive(Parser)]
#[command(name = "daftar")]
#[command(about = "Generate styled financial statements from general-ledger workbooks")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "daftar.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Document registry commands
    #[command(subcommand)]
    Document(DocumentCommands),

    /// Generate a financial statement from a ledger workbook
    Generate {
        /// Registered document ID to read the ledger from
        #[arg(long, conflicts_with = "file")]
        document: Option<String>,

        /// Ledger workbook file to read directly (.xlsx or .xls)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output file (defaults to the generated artifact name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: xlsx, csv
        #[arg(short, long, default_value = "xlsx")]
        format: String,

        /// Print the statement figures after writing the file
        #[arg(long)]
        summary: bool,

        /// Print the summary as JSON instead of a table
        #[arg(long, requires = "summary")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Register a ledger workbook that lives on disk
    Add {
        /// Path to the workbook file
        path: PathBuf,

        /// Human-readable document title
        #[arg(long)]
        title: String,

        /// Document kind: voucher, invoice, contract, letter, report, ledger, other
        #[arg(long, default_value = "ledger")]
        kind: String,
    },

    /// List registered documents
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show detailed document information
    Show {
        /// Document ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a document from the registry (the file stays on disk)
    Remove {
        /// Document ID
        id: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                StatementService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Document(document_cmd) => {
                let service = StatementService::connect(&self.database).await?;
                run_document_command(&service, document_cmd).await?;
            }

            Commands::Generate {
                document,
                file,
                output,
                format,
                summary,
                json,
            } => {
                let format = StatementFormat::from_str(&format).ok_or_else(|| {
                    anyhow::anyhow!("Invalid format '{}'. Valid formats: xlsx, csv", format)
                })?;

                let artifact = match (document, file) {
                    (Some(id), None) => {
                        let service = StatementService::connect(&self.database).await?;
                        let document_id = parse_document_id(&id)?;
                        service.generate_for_document(document_id, format).await?
                    }
                    (None, Some(path)) => generate_from_path(&path, format)?,
                    _ => anyhow::bail!("Pass exactly one of --document or --file"),
                };

                let output_path = output.unwrap_or_else(|| PathBuf::from(&artifact.filename));
                std::fs::write(&output_path, &artifact.bytes).with_context(|| {
                    format!("Failed to write output file: {}", output_path.display())
                })?;
                println!(
                    "Wrote {} ({} bytes)",
                    output_path.display(),
                    artifact.bytes.len()
                );
                if self.verbose {
                    println!("Content type: {}", artifact.content_type);
                    println!("Suggested name: {}", artifact.filename);
                }

                if summary {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&artifact.statement)?);
                    } else {
                        print_summary(&artifact.statement);
                    }
                }
            }
        }

        Ok(())
    }
}

async fn run_document_command(service: &StatementService, cmd: DocumentCommands) -> Result<()> {
    match cmd {
        DocumentCommands::Add { path, title, kind } => {
            let kind = DocumentKind::from_str(&kind).ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid document kind '{}'. Valid kinds: voucher, invoice, contract, letter, report, ledger, other",
                    kind
                )
            })?;

            let document = service
                .register_document(title, kind, path.to_string_lossy().into_owned())
                .await?;
            println!("Registered document: {} ({})", document.title, document.id);
        }

        DocumentCommands::List { json } => {
            let documents = service.list_documents().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&documents)?);
            } else if documents.is_empty() {
                println!("No documents registered.");
            } else {
                println!("{:<36} {:<10} {:<24} {:>8}", "ID", "KIND", "TITLE", "SIZE KB");
                println!("{}", "-".repeat(81));
                for document in documents {
                    println!(
                        "{:<36} {:<10} {:<24} {:>8}",
                        document.id,
                        document.kind,
                        truncate(&document.title, 24),
                        document.size_kb
                    );
                }
            }
        }

        DocumentCommands::Show { id, json } => {
            let document_id = parse_document_id(&id)?;
            let document = service.get_document(document_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                print_document(&document);
            }
        }

        DocumentCommands::Remove { id } => {
            let document_id = parse_document_id(&id)?;
            let document = service.remove_document(document_id).await?;
            println!("Removed document: {} ({})", document.title, document.id);
        }
    }
    Ok(())
}

fn parse_document_id(id: &str) -> Result<DocumentId> {
    Uuid::parse_str(id).context("Invalid document ID format (expected UUID)")
}

fn print_document(document: &Document) {
    println!("Document: {}", document.title);
    println!("  ID:        {}", document.id);
    println!("  Kind:      {}", document.kind);
    println!("  Extension: {}", document.extension);
    println!("  Path:      {}", document.file_path);
    println!("  Size:      {} KB", document.size_kb);
    println!(
        "  Created:   {}",
        document.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(updated) = document.updated_at {
        println!("  Updated:   {}", updated.format("%Y-%m-%d %H:%M:%S"));
    }
}

fn print_summary(statement: &FinancialStatement) {
    println!("{:<4} {:<45} {:>18}", "ROW", "DESCRIPTION", "AMOUNT");
    println!("{}", "-".repeat(69));
    for line in statement.lines() {
        println!("{:<4} {:<45} {:>18}", line.index, line.label, line.amount);
    }
}

// Char-based so multi-byte titles never split inside a character.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

mod common;

use anyhow::Result;
use common::{test_service, write_ledger_workbook};
use daftar::application::{AppError, StatementFormat};
use daftar::domain::DocumentKind;
use uuid::Uuid;

#[tokio::test]
async fn test_register_and_fetch_document() -> Result<()> {
    let (service, temp) = test_service().await?;

    let path = temp.path().join("ledger.xlsx");
    write_ledger_workbook(&path, &[("4101", "", "5000")])?;

    let document = service
        .register_document(
            "دفتر کل".to_string(),
            DocumentKind::Ledger,
            path.to_str().unwrap().to_string(),
        )
        .await?;

    assert_eq!(document.extension, ".xlsx");
    assert_eq!(document.kind, DocumentKind::Ledger);

    let fetched = service.get_document(document.id).await?;
    assert_eq!(fetched.id, document.id);
    assert_eq!(fetched.title, "دفتر کل");
    assert_eq!(fetched.file_path, document.file_path);

    Ok(())
}

#[tokio::test]
async fn test_list_documents_newest_first() -> Result<()> {
    let (service, temp) = test_service().await?;

    let first_path = temp.path().join("first.xlsx");
    let second_path = temp.path().join("second.xlsx");
    write_ledger_workbook(&first_path, &[("4101", "", "100")])?;
    write_ledger_workbook(&second_path, &[("4101", "", "200")])?;

    service
        .register_document(
            "First".to_string(),
            DocumentKind::Ledger,
            first_path.to_str().unwrap().to_string(),
        )
        .await?;
    // created_at has sub-second precision; keep the two registrations apart.
    std::thread::sleep(std::time::Duration::from_millis(10));
    service
        .register_document(
            "Second".to_string(),
            DocumentKind::Voucher,
            second_path.to_str().unwrap().to_string(),
        )
        .await?;

    let documents = service.list_documents().await?;
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].title, "Second");
    assert_eq!(documents[1].title, "First");

    Ok(())
}

#[tokio::test]
async fn test_register_rejects_unsupported_extension() -> Result<()> {
    let (service, temp) = test_service().await?;

    let path = temp.path().join("notes.txt");
    std::fs::write(&path, "not a spreadsheet")?;

    let result = service
        .register_document(
            "Notes".to_string(),
            DocumentKind::Other,
            path.to_str().unwrap().to_string(),
        )
        .await;

    assert!(matches!(result, Err(AppError::InvalidDocument(_))));

    let documents = service.list_documents().await?;
    assert!(documents.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_register_rejects_missing_file() -> Result<()> {
    let (service, temp) = test_service().await?;

    let path = temp.path().join("nowhere.xlsx");
    let result = service
        .register_document(
            "Ghost".to_string(),
            DocumentKind::Ledger,
            path.to_str().unwrap().to_string(),
        )
        .await;

    assert!(matches!(result, Err(AppError::FileNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_remove_document() -> Result<()> {
    let (service, temp) = test_service().await?;

    let path = temp.path().join("ledger.xlsx");
    write_ledger_workbook(&path, &[("4101", "", "5000")])?;

    let document = service
        .register_document(
            "دفتر کل".to_string(),
            DocumentKind::Ledger,
            path.to_str().unwrap().to_string(),
        )
        .await?;

    let removed = service.remove_document(document.id).await?;
    assert_eq!(removed.id, document.id);

    let result = service.get_document(document.id).await;
    assert!(matches!(result, Err(AppError::DocumentNotFound(_))));

    // The file itself is untouched.
    assert!(path.exists());

    Ok(())
}

#[tokio::test]
async fn test_generate_for_unknown_document() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service
        .generate_for_document(Uuid::new_v4(), StatementFormat::Xlsx)
        .await;

    assert!(matches!(result, Err(AppError::DocumentNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_generate_when_stored_file_vanished() -> Result<()> {
    let (service, temp) = test_service().await?;

    let path = temp.path().join("ledger.xlsx");
    write_ledger_workbook(&path, &[("4101", "", "5000")])?;

    let document = service
        .register_document(
            "دفتر کل".to_string(),
            DocumentKind::Ledger,
            path.to_str().unwrap().to_string(),
        )
        .await?;

    std::fs::remove_file(&path)?;

    let result = service
        .generate_for_document(document.id, StatementFormat::Xlsx)
        .await;

    assert!(matches!(result, Err(AppError::DocumentFileMissing { .. })));

    Ok(())
}

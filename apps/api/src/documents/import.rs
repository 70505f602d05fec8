//! File import boundary: brings resume files from the local filesystem into the store.
//!
//! Files are read as opaque bytes. Only the suffix is checked, never the content.

use std::path::Path;

use sqlx::SqlitePool;
use tracing::info;

use crate::documents::extract::DocumentKind;
use crate::documents::resumes::add_resume;
use crate::errors::AppError;

/// Rejects anything that is not a `.pdf` or `.docx` file name.
pub fn ensure_importable(filename: &str) -> Result<(), AppError> {
    match DocumentKind::from_filename(filename) {
        DocumentKind::Pdf | DocumentKind::Docx => Ok(()),
        DocumentKind::Text => Err(AppError::Validation(format!(
            "'{filename}' is not a .pdf or .docx file"
        ))),
    }
}

/// Reads a resume file from disk and stores it under its file name.
pub async fn import_resume_file(
    pool: &SqlitePool,
    user_id: i64,
    path: &Path,
) -> Result<i64, AppError> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::Validation(format!("{} has no usable file name", path.display())))?;
    ensure_importable(filename)?;

    let content = tokio::fs::read(path).await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to read {}: {e}", path.display()))
    })?;

    info!("Importing {} for user {user_id}", path.display());
    add_resume(pool, user_id, filename, &content).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::store::register;
    use crate::db::test_pool;
    use crate::documents::resumes::get_resume_by_filename;

    #[test]
    fn test_only_pdf_and_docx_importable() {
        assert!(ensure_importable("cv.pdf").is_ok());
        assert!(ensure_importable("CV.Docx").is_ok());
        assert!(ensure_importable("cv.txt").is_err());
        assert!(ensure_importable("cv.doc").is_err());
    }

    #[tokio::test]
    async fn test_import_stores_bytes_verbatim() {
        let pool = test_pool().await;
        let uid = register(&pool, "alice", "pw", "user").await.unwrap().id;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        // Not a real PDF: contents are not checked against the extension.
        std::fs::write(&path, b"plain bytes pretending to be a pdf").unwrap();

        import_resume_file(&pool, uid, &path).await.unwrap();

        let stored = get_resume_by_filename(&pool, uid, "resume.pdf")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.content, b"plain bytes pretending to be a pdf");
    }

    #[tokio::test]
    async fn test_import_rejects_other_suffixes() {
        let pool = test_pool().await;
        let uid = register(&pool, "alice", "pw", "user").await.unwrap().id;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, b"text").unwrap();

        let err = import_resume_file(&pool, uid, &path).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_import_missing_file_fails() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let err = import_resume_file(&pool, 1, &dir.path().join("ghost.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}

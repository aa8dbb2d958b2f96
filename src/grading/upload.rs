// src/grading/upload.rs
//! Resume file validation, run by callers before any grading request

use reqwest::multipart::{Form, Part};
use std::path::Path;

use crate::core::FsOps;
use crate::error::ClientError;
use crate::utils::{content_type_for, format_megabytes, validate_file_extension};

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx"];
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Multipart field name expected by `/api/grade-cv`
const FILE_FIELD: &str = "file";

/// Check size ceiling and extension whitelist.
pub fn validate_upload(file_name: &str, size: u64) -> Result<(), ClientError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ClientError::Validation(format!(
            "File size must be less than 5MB (got {})",
            format_megabytes(size)
        )));
    }
    validate_file_extension(file_name, ALLOWED_EXTENSIONS)
        .map_err(|_| ClientError::Validation("Only PDF and DOCX files are supported".to_string()))?;
    Ok(())
}

/// A resume document held in memory, ready for upload
#[derive(Debug, Clone)]
pub struct CvUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl CvUpload {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            bytes,
        }
    }

    /// Validate from metadata first, then read the file.
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let file_name = FsOps::file_name(path).ok_or_else(|| {
            ClientError::Validation(format!("Not a file path: {}", path.display()))
        })?;
        let size = FsOps::file_size(path).await?;
        validate_upload(&file_name, size)?;

        let bytes = FsOps::read_bytes(path).await?;
        Ok(Self { file_name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        validate_upload(&self.file_name, self.size())
    }

    pub(crate) fn into_form(self) -> Result<Form, ClientError> {
        let extension = crate::utils::get_file_extension(&self.file_name).unwrap_or_default();
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(content_type_for(&extension))
            .map_err(|e| ClientError::Validation(format!("Failed to create multipart: {}", e)))?;
        Ok(Form::new().part(FILE_FIELD, part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_pdf_and_docx() {
        assert!(validate_upload("resume.PDF", 1024).is_ok());
        assert!(validate_upload("resume.docx", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn test_rejects_other_types() {
        let err = validate_upload("resume.doc", 10).unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref m) if m == "Only PDF and DOCX files are supported"));
        assert!(validate_upload("resume", 10).is_err());
    }

    #[test]
    fn test_rejects_oversize_before_type() {
        let err = validate_upload("resume.txt", MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert!(err.to_string().contains("less than 5MB"));
    }

    #[tokio::test]
    async fn test_from_path_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("jane.pdf");
        tokio::fs::write(&good, b"%PDF-1.4 body").await.unwrap();
        let upload = CvUpload::from_path(&good).await.unwrap();
        assert_eq!(upload.file_name, "jane.pdf");
        assert_eq!(upload.size(), 13);

        let bad = dir.path().join("notes.txt");
        tokio::fs::write(&bad, b"hello").await.unwrap();
        assert!(matches!(
            CvUpload::from_path(&bad).await,
            Err(ClientError::Validation(_))
        ));
    }
}

// src/utils.rs
use crate::error::ClientError;

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<String, ClientError> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| ClientError::Validation(format!("File has no extension: {}", filename)))?;

    if !allowed.contains(&ext.as_str()) {
        return Err(ClientError::Validation(format!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext, allowed
        )));
    }

    Ok(ext)
}

/// MIME type for a resume document extension
pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "doc" => "application/msword",
        _ => "application/octet-stream",
    }
}

/// Human-readable size in megabytes
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("test.pdf"), Some("pdf".to_string()));
        assert_eq!(
            get_file_extension("document.DOCX"),
            Some("docx".to_string())
        );
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("test.pdf", &["pdf", "docx"]).is_ok());
        assert!(validate_file_extension("test.txt", &["pdf", "docx"]).is_err());
        assert!(validate_file_extension("noext", &["pdf"]).is_err());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("pdf"), "application/pdf");
        assert!(content_type_for("docx").contains("wordprocessingml"));
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(5 * 1024 * 1024), "5.0MB");
    }
}

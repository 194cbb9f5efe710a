//! Resume upload validation and PDF text extraction.

use crate::errors::AppError;

pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_FILES_PER_REQUEST: usize = 10;
/// Multipart body budget: every file at its limit, plus form-field headroom.
pub const MAX_BODY_BYTES: usize = MAX_FILE_BYTES * MAX_FILES_PER_REQUEST + 1024 * 1024;

/// Rejects uploads that are not PDFs or exceed the per-file size limit.
pub fn validate_upload(filename: &str, len: usize) -> Result<(), AppError> {
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(AppError::Validation(format!(
            "'{filename}' is not a PDF; only .pdf resumes are accepted"
        )));
    }
    if len == 0 {
        return Err(AppError::Validation(format!("'{filename}' is empty")));
    }
    if len > MAX_FILE_BYTES {
        return Err(AppError::Validation(format!(
            "'{filename}' is {len} bytes; the limit is {MAX_FILE_BYTES}"
        )));
    }
    Ok(())
}

/// Pulls plain text out of an uploaded PDF. A resume that yields no text at
/// all (scanned images, encrypted files) is unprocessable.
pub fn extract_resume_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("could not read PDF: {e}")))?;
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Extraction(
            "the PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

/// Candidate name shown in results: the upload's file stem, with any path
/// prefix some browsers include stripped off.
pub fn candidate_name_from_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    let stem = base
        .strip_suffix(".pdf")
        .or_else(|| base.strip_suffix(".PDF"))
        .unwrap_or(base)
        .trim();
    if stem.is_empty() {
        "Unknown Candidate".to_string()
    } else {
        stem.to_string()
    }
}

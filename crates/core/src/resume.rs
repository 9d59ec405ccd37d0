//! Local validation of the resume a passing candidate may attach.
//!
//! Nothing is uploaded; the file is only checked for size and type.

use thiserror::Error;

use crate::config::RESUME_MAX_BYTES;

/// Value for the file input's `accept` attribute.
pub const ACCEPT_ATTRIBUTE: &str = ".pdf,.doc,.docx,application/pdf,application/msword,application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const ACCEPTED_EXTENSIONS: [&str; 3] = [".pdf", ".doc", ".docx"];

const ACCEPTED_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResumeError {
    #[error("File too large. Maximum allowed size is 2 MB.")]
    TooLarge { size_bytes: u64 },

    #[error("Invalid file type. Please upload a PDF, DOC or DOCX file.")]
    InvalidType,
}

/// What the file picker reports about a chosen file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime: Option<String>,
}

/// A resume that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedResume {
    pub name: String,
    pub size_bytes: u64,
}

impl AcceptedResume {
    /// Confirmation line, e.g. `"Received: cv.pdf"`.
    #[must_use]
    pub fn confirmation(&self) -> String {
        format!("Received: {}", self.name)
    }
}

/// Checks size first, then type. A file passes the type check if either its
/// name ends in `.pdf`, `.doc` or `.docx` (any case) or its MIME type is one
/// of PDF, DOC or DOCX.
///
/// # Errors
///
/// Returns `ResumeError::TooLarge` above 2 MiB and `ResumeError::InvalidType`
/// for anything that is not a PDF or Word document.
pub fn validate_resume(file: &ResumeFile) -> Result<AcceptedResume, ResumeError> {
    if file.size_bytes > RESUME_MAX_BYTES {
        return Err(ResumeError::TooLarge {
            size_bytes: file.size_bytes,
        });
    }

    let name = file.name.to_ascii_lowercase();
    let extension_ok = ACCEPTED_EXTENSIONS
        .iter()
        .any(|accepted| name.ends_with(accepted));
    let mime_ok = file
        .mime
        .as_deref()
        .is_some_and(|mime| ACCEPTED_MIME_TYPES.contains(&mime));

    if !extension_ok && !mime_ok {
        return Err(ResumeError::InvalidType);
    }
    Ok(AcceptedResume {
        name: file.name.clone(),
        size_bytes: file.size_bytes,
    })
}

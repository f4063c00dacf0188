use crate::models::{AcceptedFile, UploadedFile};
use thiserror::Error;

/// Receipt extensions accepted for a bill attachment (lowercase, without the dot).
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File type of '{file_name}' is not allowed. Only jpg, jpeg and png receipts are accepted.")]
    InvalidFileType { file_name: String },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidFileType { .. } => "INVALID_FILE_TYPE",
        }
    }
}

/// Checks a receipt before upload. Only the extension decides; nothing is sent anywhere.
pub fn validate_file(file: UploadedFile) -> Result<AcceptedFile, ValidationError> {
    let extension = match file.extension() {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => ext,
        _ => {
            tracing::warn!("Rejected receipt with invalid file type: {}", file.file_name);
            return Err(ValidationError::InvalidFileType {
                file_name: file.file_name,
            });
        }
    };

    let content_type = resolve_content_type(file.content_type.as_deref(), &extension);
    tracing::debug!(
        "Accepted receipt '{}' ({})",
        file.file_name,
        content_type.essence_str()
    );
    Ok(AcceptedFile::new(file, content_type))
}

/// Uses the declared MIME type when it agrees with the extension, otherwise the one
/// inferred from the extension.
fn resolve_content_type(declared: Option<&str>, extension: &str) -> mime::Mime {
    let inferred = match extension {
        "png" => mime::IMAGE_PNG,
        _ => mime::IMAGE_JPEG,
    };

    match declared.and_then(|d| d.parse::<mime::Mime>().ok()) {
        Some(m) if m.essence_str() == inferred.essence_str() => m,
        Some(m) => {
            tracing::debug!(
                "Declared MIME type '{}' does not match extension '.{}', using {}",
                m,
                extension,
                inferred
            );
            inferred
        }
        None => inferred,
    }
}

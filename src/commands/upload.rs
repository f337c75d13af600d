use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::{
    errors::{AppError, AppResult},
    types::DocumentFormat,
};

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn format(&self) -> AppResult<DocumentFormat> {
        DocumentFormat::from_filename(&self.filename)
    }

    /// Rejects anything but DOCX, before any model call is made.
    pub fn require_docx(&self) -> AppResult<()> {
        match self.format()? {
            DocumentFormat::Docx => Ok(()),
            other => Err(AppError::UnsupportedFormat(format!(
                "{} uploads cannot be revised, please upload a .docx file",
                other.as_str()
            ))),
        }
    }

    pub fn digest(&self) -> String {
        checksum_bytes(&self.bytes)
    }
}

fn checksum_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// File fields of a multipart body, keyed by field name.
///
/// As an extractor it answers malformed or non-multipart bodies with the
/// JSON `INVALID_INPUT` error instead of axum's plain-text rejection.
#[derive(Debug, Default)]
pub struct Uploads {
    files: HashMap<String, Upload>,
}

impl<S> FromRequest<S> for Uploads
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
        Self::read(multipart).await
    }
}

impl Uploads {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut files = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| AppError::InvalidInput(err.body_text()))?
        {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };
            let Some(filename) = field.file_name().map(ToString::to_string) else {
                continue;
            };
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::InvalidInput(err.body_text()))?;
            files.insert(
                name,
                Upload {
                    filename,
                    bytes: bytes.to_vec(),
                },
            );
        }
        Ok(Self { files })
    }

    pub fn take(&mut self, field: &str) -> AppResult<Upload> {
        match self.files.remove(field) {
            Some(upload) if !upload.filename.trim().is_empty() => Ok(upload),
            _ => Err(AppError::InvalidInput(format!("no file uploaded in field `{field}`"))),
        }
    }
}

pub fn request_span(operation: &'static str, upload: &Upload) -> tracing::Span {
    tracing::info_span!(
        "request",
        operation,
        request_id = %Uuid::new_v4(),
        filename = %upload.filename,
        digest = %upload.digest(),
        size = upload.bytes.len(),
    )
}

/// Binary download with an attachment filename.
pub fn attachment(bytes: Vec<u8>, content_type: &'static str, filename: &str) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", header_safe(filename));
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

fn header_safe(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

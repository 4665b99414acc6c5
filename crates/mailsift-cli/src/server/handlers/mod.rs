//! API request handlers.

mod health;
mod preview;
mod upload;

pub use health::*;
pub use preview::*;
pub use upload::*;

use axum::body::Bytes;
use axum::extract::Multipart;
use mailsift::InputKind;

use crate::server::error::ApiError;

/// Name of the multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// A file received through a multipart form.
struct Upload {
    file_name: String,
    kind: InputKind,
    bytes: Bytes,
}

/// Pull the `file` field out of a multipart form and check its name and size.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let kind = InputKind::from_filename(&file_name)?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }

        return Ok(Upload {
            file_name,
            kind,
            bytes,
        });
    }

    Err(ApiError::BadRequest(format!(
        "Missing '{}' field in upload",
        FILE_FIELD
    )))
}

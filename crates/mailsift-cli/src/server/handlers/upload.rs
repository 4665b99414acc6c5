//! Upload handler: filter a mailing list and return the workbook.

use axum::{
    extract::{Multipart, State},
    http::{HeaderName, header},
    response::IntoResponse,
};
use mailsift::{CancelFlag, MailsiftError, OutputFormat};
use tracing::info;

use super::read_upload;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// File name offered to the browser for the filtered workbook.
pub const OUTPUT_FILE_NAME: &str = "filtered_output.xlsx";

/// Number of rows written, excluding the header.
pub const KEPT_HEADER: HeaderName = HeaderName::from_static("x-mailsift-kept");

/// Number of data rows read from the upload.
pub const ROWS_HEADER: HeaderName = HeaderName::from_static("x-mailsift-rows");

/// Raises the flag when the request future is dropped, e.g. on client disconnect.
struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Filter an uploaded CSV/XLSX list and return the kept rows as XLSX.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_upload(multipart).await?;
    let mailsift = state.mailsift.clone();

    let cancel = CancelFlag::new();
    let _guard = CancelOnDrop(cancel.clone());

    let (report, workbook) = tokio::task::spawn_blocking(move || {
        let report = mailsift.filter_bytes_with_cancel(&upload.file_name, &upload.bytes, cancel)?;
        let workbook = mailsift.render_as(&report, OutputFormat::Xlsx)?;
        Ok::<_, MailsiftError>((report, workbook))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Filter task failed: {}", e)))??;

    info!(
        file = %report.source.file,
        rows = report.stats.rows_read,
        kept = report.stats.kept,
        "upload filtered"
    );

    Ok((
        [
            (
                header::CONTENT_TYPE,
                OutputFormat::Xlsx.content_type().to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", OUTPUT_FILE_NAME),
            ),
            (KEPT_HEADER, report.stats.kept.to_string()),
            (ROWS_HEADER, report.stats.rows_read.to_string()),
        ],
        workbook,
    ))
}

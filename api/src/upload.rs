use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use care_companion::{CompanionError, Submission, UploadedFile};

/// Reads the `file` and `question` form fields. A file input left empty by
/// the browser (no name, no bytes) counts as no upload.
pub async fn read_submission(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<Submission, CompanionError> {
    let mut submission = Submission::default();
    let invalid = |error: MultipartError| upload_error(error, max_upload_bytes);

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .filter(|s| !s.is_empty());
                let media_type = field
                    .content_type()
                    .unwrap_or("application/pdf")
                    .to_string();
                let bytes = field.bytes().await.map_err(invalid)?;

                if bytes.is_empty() && filename.is_none() {
                    continue;
                }
                log::info!(
                    "Received upload {} ({} bytes, {})",
                    filename.as_deref().unwrap_or("<unnamed>"),
                    bytes.len(),
                    media_type
                );
                submission.file = Some(UploadedFile {
                    filename,
                    media_type,
                    bytes,
                });
            }
            "question" => {
                submission.question = field.text().await.map_err(invalid)?;
            }
            other => log::debug!("Ignoring unexpected form field: {other}"),
        }
    }

    Ok(submission)
}

fn upload_error(error: MultipartError, max_upload_bytes: usize) -> CompanionError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CompanionError::UploadTooLarge {
            limit: max_upload_bytes,
        }
    } else {
        CompanionError::InvalidUpload(error.body_text())
    }
}

use crate::error::{CompanionError, Result};
use crate::models::{Page, UploadedFile};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::{Builder, NamedTempFile};

/// Turns a PDF on local storage into page-ordered text.
pub trait PdfExtractor: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<Page>>;
}

/// Default extractor backed by `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<Page>> {
        let pages = pdf_extract::extract_text_by_pages(path)
            .map_err(|error| CompanionError::Extraction(error.to_string()))?;

        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(index, text)| Page { index, text })
            .collect())
    }
}

/// Copy of an upload on disk. The file is removed when this value is dropped,
/// whichever way the request ends.
#[derive(Debug)]
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    pub fn write(upload: &UploadedFile) -> Result<Self> {
        let mut file = Builder::new()
            .prefix("companion-upload-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(&upload.bytes)?;
        file.flush()?;

        log::debug!(
            "Stored upload ({} bytes) at {}",
            upload.bytes.len(),
            file.path().display()
        );
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Writes the upload to a temp file and runs the extractor on it, both on the
/// blocking pool. The temp file is gone by the time this returns, including
/// when the PDF parser panics; the panic is reported as an extraction failure.
pub async fn extract_upload_blocking(
    extractor: Arc<dyn PdfExtractor>,
    upload: UploadedFile,
) -> Result<Vec<Page>> {
    tokio::task::spawn_blocking(move || {
        let temp = TempUpload::write(&upload)?;
        extractor.extract_pages(temp.path())
    })
    .await
    .map_err(|join_error| CompanionError::Extraction(format!("PDF parser aborted: {join_error}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[test]
    fn temp_upload_is_removed_on_drop() {
        let upload = UploadedFile::pdf(b"%PDF-1.4 not really".to_vec());
        let temp = TempUpload::write(&upload).unwrap();
        let path = temp.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), upload.bytes);

        drop(temp);
        assert!(!path.exists());
    }

    #[test]
    fn garbage_bytes_fail_extraction() {
        let upload = UploadedFile::pdf(b"this is not a pdf document".to_vec());
        let temp = TempUpload::write(&upload).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            PdfTextExtractor.extract_pages(temp.path())
        }));
        // Either an error or a parser panic; never a successful parse.
        assert!(!matches!(result, Ok(Ok(_))));
    }

    /// Records the path it was given and whether the file existed, then
    /// either returns one page or panics.
    struct Recording {
        seen: Mutex<Option<(PathBuf, bool)>>,
        panic: bool,
    }

    impl Recording {
        fn new(panic: bool) -> Self {
            Self {
                seen: Mutex::new(None),
                panic,
            }
        }
    }

    impl PdfExtractor for Recording {
        fn extract_pages(&self, path: &Path) -> Result<Vec<Page>> {
            *self.seen.lock().unwrap() = Some((path.to_path_buf(), path.exists()));
            if self.panic {
                panic!("boom");
            }
            Ok(vec![Page {
                index: 0,
                text: "page".to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn upload_exists_only_while_extracting() {
        let extractor = Arc::new(Recording::new(false));
        let pages = extract_upload_blocking(extractor.clone(), UploadedFile::pdf(&b"%PDF"[..]))
            .await
            .unwrap();
        assert_eq!(pages.len(), 1);

        let (path, existed) = extractor.seen.lock().unwrap().clone().unwrap();
        assert!(existed);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn parser_panic_becomes_extraction_error_and_cleans_up() {
        let extractor = Arc::new(Recording::new(true));
        let err = extract_upload_blocking(extractor.clone(), UploadedFile::pdf(&b"%PDF"[..]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "extraction");

        let (path, existed) = extractor.seen.lock().unwrap().clone().unwrap();
        assert!(existed);
        assert!(!path.exists());
    }
}

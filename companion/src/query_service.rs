use crate::context::{assemble_context, MAX_CONTEXT_CHARS};
use crate::document_processor::{extract_upload_blocking, PdfExtractor, PdfTextExtractor};
use crate::error::{CompanionError, Result};
use crate::gemini_service::ModelInvoker;
use crate::models::*;
use crate::prompt::PromptInstance;
use crate::text_splitter::{SplitterConfig, TextSplitter};
use std::sync::Arc;

/// How a single submission ended.
#[derive(Debug)]
pub enum Outcome {
    MissingInput,
    Success(Answer),
    Failure(CompanionError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// Checks that there is a file and a non-blank question, handing both back.
pub fn validate(submission: &Submission) -> Result<(&UploadedFile, &str)> {
    match &submission.file {
        Some(file) if !submission.question.trim().is_empty() => {
            Ok((file, submission.question.as_str()))
        }
        _ => Err(CompanionError::MissingInput),
    }
}

pub struct QueryService {
    extractor: Arc<dyn PdfExtractor>,
    splitter: TextSplitter,
    invoker: Arc<dyn ModelInvoker>,
    max_context_chars: usize,
}

impl QueryService {
    /// Default pipeline: `pdf-extract`, 1000/200 splitting, 5000-char context.
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Result<Self> {
        Ok(Self::with_parts(
            Arc::new(PdfTextExtractor),
            TextSplitter::new(SplitterConfig::default())?,
            invoker,
        ))
    }

    pub fn with_parts(
        extractor: Arc<dyn PdfExtractor>,
        splitter: TextSplitter,
        invoker: Arc<dyn ModelInvoker>,
    ) -> Self {
        Self {
            extractor,
            splitter,
            invoker,
            max_context_chars: MAX_CONTEXT_CHARS,
        }
    }

    pub fn model_name(&self) -> &str {
        self.invoker.model_name()
    }

    /// Runs one submission to an end state. Never panics on pipeline errors.
    pub async fn respond(&self, submission: &Submission) -> Outcome {
        match self.run(submission).await {
            Ok(answer) => Outcome::Success(answer),
            Err(CompanionError::MissingInput) => {
                log::warn!("Submission rejected: missing file or blank question");
                Outcome::MissingInput
            }
            Err(error) => {
                log::error!("Request failed ({}): {}", error.kind(), error);
                Outcome::Failure(error)
            }
        }
    }

    pub async fn run(&self, submission: &Submission) -> Result<Answer> {
        let (file, question) = validate(submission)?;
        let start_time = std::time::Instant::now();

        let pages = extract_upload_blocking(self.extractor.clone(), file.clone()).await?;
        log::info!("Extracted {} pages", pages.len());

        let chunks = self.splitter.split_pages(&pages);
        let context = assemble_context(&chunks, self.max_context_chars);

        let prompt = PromptInstance::new(question, &context.text).render();
        let response = self.invoker.invoke(&prompt).await?;

        let processing_time = start_time.elapsed().as_millis();
        log::info!("Answer generated in {processing_time} ms");

        Ok(Answer {
            response,
            summary: ProcessingSummary {
                pages: pages.len(),
                chunks: chunks.len(),
                context_chars: context.char_len(),
                truncated: context.truncated,
                processing_time_ms: processing_time,
            },
        })
    }
}

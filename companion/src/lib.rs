pub mod config;
pub mod context;
pub mod document_processor;
pub mod error;
pub mod gemini_service;
pub mod models;
pub mod prompt;
pub mod query_service;
pub mod text_splitter;

pub use config::{GeminiSettings, Settings};
pub use context::{assemble_context, MAX_CONTEXT_CHARS};
pub use document_processor::{PdfExtractor, PdfTextExtractor, TempUpload};
pub use error::{CompanionError, Result};
pub use gemini_service::{GeminiService, ModelInvoker};
pub use models::*;
pub use prompt::PromptInstance;
pub use query_service::{validate, Outcome, QueryService};
pub use text_splitter::{SplitterConfig, TextSplitter};

use crate::models::{AssembledContext, Chunk};

pub const MAX_CONTEXT_CHARS: usize = 5000;
pub const CHUNK_JOINER: &str = " ";

/// Joins chunk texts with a space and keeps the first `max_chars` characters.
/// The cut is positional and may land mid-sentence; anything past the budget
/// never reaches the model.
pub fn assemble_context(chunks: &[Chunk], max_chars: usize) -> AssembledContext {
    let joined = chunks
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(CHUNK_JOINER);

    match joined.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            log::warn!(
                "Document text truncated to {} of {} characters",
                max_chars,
                joined.chars().count()
            );
            AssembledContext {
                text: joined[..cut].to_string(),
                truncated: true,
            }
        }
        None => AssembledContext {
            text: joined,
            truncated: false,
        },
    }
}

const TEMPLATE: &str = "
You are a helpful and empathetic medical assistant.
- Summarize the uploaded medical PDF content: {pdf_content}.
- Respond to the user's medical concern: {user_question}.
- Explain issues in *simpler terms* with examples.
- Provide *empathetic and supportive* responses.
- Focus only on *medical and mental health* related topics.
";

/// The fixed instructions with both slots bound.
#[derive(Debug, Clone)]
pub struct PromptInstance<'a> {
    pub user_question: &'a str,
    pub pdf_content: &'a str,
}

impl<'a> PromptInstance<'a> {
    pub fn new(user_question: &'a str, pdf_content: &'a str) -> Self {
        Self {
            user_question,
            pdf_content,
        }
    }

    /// Slots are filled in one pass so braces inside the document or the
    /// question are never re-interpreted.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            TEMPLATE.len() + self.pdf_content.len() + self.user_question.len(),
        );
        let mut rest = TEMPLATE;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open..];
            if let Some(value) = self.slot(after) {
                out.push_str(value.1);
                rest = &after[value.0..];
            } else {
                out.push('{');
                rest = &after[1..];
            }
        }
        out.push_str(rest);
        out
    }

    fn slot(&self, at: &str) -> Option<(usize, &'a str)> {
        const PDF: &str = "{pdf_content}";
        const QUESTION: &str = "{user_question}";
        if at.starts_with(PDF) {
            Some((PDF.len(), self.pdf_content))
        } else if at.starts_with(QUESTION) {
            Some((QUESTION.len(), self.user_question))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_slots_are_filled() {
        let prompt = PromptInstance::new("Why am I tired?", "Iron levels low.").render();
        assert!(prompt.contains("Summarize the uploaded medical PDF content: Iron levels low.."));
        assert!(prompt.contains("Respond to the user's medical concern: Why am I tired?."));
        assert!(prompt.contains("Focus only on *medical and mental health* related topics."));
        assert!(!prompt.contains("{pdf_content}"));
        assert!(!prompt.contains("{user_question}"));
    }

    #[test]
    fn braces_in_values_are_left_alone() {
        let prompt = PromptInstance::new("{pdf_content}?", "table {a} {user_question}").render();
        assert!(prompt.contains("content: table {a} {user_question}."));
        assert!(prompt.contains("concern: {pdf_content}?."));
    }
}

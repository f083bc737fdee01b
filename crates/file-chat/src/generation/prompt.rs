//! Prompt templates for answering, summarizing and translating

/// Prompt builder for backend requests
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the question-answering prompt over a file's content
    pub fn build_answer_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are a helpful assistant answering questions about an uploaded file.
Use the file content below to answer. If the answer is not in the file, say so.

FILE CONTENT:
{context}

QUESTION: {question}

ANSWER:"#,
            context = context,
            question = question,
        )
    }

    /// Build the prompt that condenses one chunk of a long file
    pub fn build_summary_prompt(chunk: &str) -> String {
        format!(
            r#"Summarize the following text in a few sentences. Keep names, numbers and key facts.

TEXT:
{chunk}

SUMMARY:"#,
            chunk = chunk,
        )
    }

    /// Build the translation prompt
    pub fn build_translation_prompt(text: &str, language: &str) -> String {
        format!(
            r#"Translate the following text to {language}. Reply with the translation only.

TEXT:
{text}"#,
            language = language,
            text = text,
        )
    }
}

/// Cut `text` to at most `limit` characters on a char boundary
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

//! Text extraction for uploaded PDF, TXT, DOCX and CSV files

use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{FileType, UploadedFile};

/// pdf-extract can hang on some font encodings
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Glyph names and typographic characters that pdf-extract leaves behind
const PDF_REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{2010}", "-"),  // Hyphen
    ("\u{2011}", "-"),  // Non-breaking hyphen
    ("\u{2013}", "-"),  // En dash
    ("\u{2014}", "--"), // Em dash
    ("\u{2018}", "'"),
    ("\u{2019}", "'"),
    ("\u{201C}", "\""),
    ("\u{201D}", "\""),
    ("\u{2022}", "* "), // Bullet
    ("\u{2026}", "..."),
    ("\u{00A0}", " "),
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
];

/// Clean up PDF text: typographic characters, null bytes, blank lines
fn cleanup_pdf_text(text: &str) -> String {
    let mut result = text.replace('\0', "");
    for (from, to) in PDF_REPLACEMENTS {
        result = result.replace(from, to);
    }

    result
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text extracted from an upload
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// File type
    pub file_type: FileType,
    /// Extracted text content
    pub content: String,
}

impl ParsedDocument {
    fn new(file_type: FileType, content: String) -> Self {
        Self { file_type, content }
    }

    /// Content length in characters
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// Multi-format file parser
pub struct FileParser;

impl FileParser {
    /// Extract the textual content of an upload on the blocking pool
    pub async fn extract_content(file: &UploadedFile) -> Result<ParsedDocument> {
        let filename = file.filename.clone();
        let data = file.data.clone();

        tokio::task::spawn_blocking(move || Self::parse(&filename, &data))
            .await
            .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))?
    }

    /// Parse a file based on its extension
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let file_type = FileType::from_filename(filename);

        let parsed = match file_type {
            FileType::Pdf => Self::parse_pdf(filename, data)?,
            FileType::Txt => Self::parse_text(data),
            FileType::Docx => Self::parse_docx(filename, data)?,
            FileType::Csv => Self::parse_csv(filename, data)?,
            FileType::Unknown => {
                let ext = filename.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
                return Err(Error::UnsupportedFileType(format!(
                    "'{}' (accepted: {})",
                    ext,
                    FileType::ACCEPTED_EXTENSIONS.join(", ")
                )));
            }
        };

        tracing::debug!(
            "Extracted {} characters from {} ({})",
            parsed.char_count(),
            filename,
            file_type.display_name()
        );

        Ok(parsed)
    }

    /// Parse PDF document
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let content = Self::extract_pdf_with_timeout(filename, data)?;
        let content = cleanup_pdf_text(&content);

        if content.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text content could be extracted from PDF",
            ));
        }

        Ok(ParsedDocument::new(FileType::Pdf, content))
    }

    /// Run pdf-extract on a helper thread so a pathological font cannot block the caller
    fn extract_pdf_with_timeout(filename: &str, data: &[u8]) -> Result<String> {
        use std::sync::mpsc;
        use std::thread;

        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(PDF_EXTRACT_TIMEOUT) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                tracing::warn!("pdf-extract failed for {}: {}, trying fallback", filename, e);
                Self::extract_pdf_text_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!(
                    "PDF extraction timeout after {:?} for {}",
                    PDF_EXTRACT_TIMEOUT,
                    filename
                );
                Self::extract_pdf_text_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed for {}", filename);
                Self::extract_pdf_text_fallback(filename, data)
            }
        }
    }

    /// Fallback PDF text extraction using lopdf directly
    fn extract_pdf_text_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let text = doc
            .extract_text(&page_numbers)
            .map_err(|e| Error::file_parse(filename, format!("Failed to extract text: {}", e)))?;

        if text.trim().is_empty() {
            tracing::warn!("Fallback extraction produced no text, PDF may be image-based");
            return Err(Error::file_parse(
                filename,
                "PDF appears to be image-based or has no extractable text",
            ));
        }

        Ok(text)
    }

    /// Parse plain text
    fn parse_text(data: &[u8]) -> ParsedDocument {
        let content = String::from_utf8_lossy(data);
        let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);
        ParsedDocument::new(FileType::Txt, content.to_string())
    }

    /// Parse DOCX document, one line per paragraph
    fn parse_docx(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut content = String::new();

        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        Ok(ParsedDocument::new(FileType::Docx, content))
    }

    /// Parse CSV file: header and rows joined with ` | `
    fn parse_csv(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);
        let mut content = String::new();

        let headers = reader
            .headers()
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;
        content.push_str(&headers.iter().collect::<Vec<_>>().join(" | "));
        content.push('\n');

        for record in reader.records() {
            let record = record.map_err(|e| Error::file_parse(filename, e.to_string()))?;
            content.push_str(&record.iter().collect::<Vec<_>>().join(" | "));
            content.push('\n');
        }

        Ok(ParsedDocument::new(FileType::Csv, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_text() {
        let parsed = FileParser::parse("notes.txt", b"\xEF\xBB\xBFhello world").unwrap();
        assert_eq!(parsed.file_type, FileType::Txt);
        assert_eq!(parsed.content, "hello world");
        assert_eq!(parsed.char_count(), 11);
    }

    #[test]
    fn test_parse_csv() {
        let data = b"name,age\nalice,30\nbob,41,extra\n";
        let parsed = FileParser::parse("people.csv", data).unwrap();
        assert_eq!(parsed.content, "name | age\nalice | 30\nbob | 41 | extra\n");
    }

    #[test]
    fn test_parse_docx() {
        use docx_rs::{Docx, Paragraph, Run};

        let mut buf = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("First line")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Second line")))
            .build()
            .pack(&mut buf)
            .unwrap();

        let parsed = FileParser::parse("memo.docx", buf.get_ref()).unwrap();
        assert_eq!(parsed.file_type, FileType::Docx);
        assert!(parsed.content.contains("First line\n"));
        assert!(parsed.content.contains("Second line\n"));
    }

    #[test]
    fn test_unsupported_type() {
        let err = FileParser::parse("slides.pptx", b"PK").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }

    #[test]
    fn test_corrupt_pdf() {
        let err = FileParser::parse("broken.pdf", b"not a pdf at all").unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn test_corrupt_docx() {
        let err = FileParser::parse("broken.docx", b"definitely not a zip").unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn test_cleanup_pdf_text() {
        let cleaned = cleanup_pdf_text("  \u{FB01}rst\u{2014}line \n\n\0second\u{2026}  ");
        assert_eq!(cleaned, "first--line\nsecond...");
    }

    #[tokio::test]
    async fn test_extract_content_uses_filename() {
        let file = UploadedFile::new("a.txt", &b"abc"[..]);
        let parsed = FileParser::extract_content(&file).await.unwrap();
        assert_eq!(parsed.content, "abc");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_extract_content_leaves_runtime_free() {
        let file = UploadedFile::new("broken.docx", &b"definitely not a zip"[..]);
        let ticker = tokio::spawn(async { tokio::task::yield_now().await });

        let err = FileParser::extract_content(&file).await.unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
        tokio_test::assert_ok!(ticker.await);
    }
}

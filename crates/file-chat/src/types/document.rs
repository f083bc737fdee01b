//! Uploaded file types

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Plain text file
    Txt,
    /// Microsoft Word document (.docx)
    Docx,
    /// CSV file
    Csv,
    /// Anything else
    Unknown,
}

impl FileType {
    /// Extensions accepted by the upload control
    pub const ACCEPTED_EXTENSIONS: [&'static str; 4] = ["pdf", "txt", "docx", "csv"];

    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "txt" | "text" => Self::Txt,
            "docx" => Self::Docx,
            "csv" => Self::Csv,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a file name
    pub fn from_filename(filename: &str) -> Self {
        match filename.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Self::Unknown,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Txt => "Text File",
            Self::Docx => "Word Document (.docx)",
            Self::Csv => "CSV",
            Self::Unknown => "Unknown",
        }
    }
}

/// Raw upload kept in the session so content can be extracted per interaction
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name
    pub filename: String,
    /// Detected type
    pub file_type: FileType,
    /// File bytes
    pub data: Bytes,
}

impl UploadedFile {
    /// Create an upload, detecting the type from the file name
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let filename = filename.into();
        Self {
            file_type: FileType::from_filename(&filename),
            filename,
            data: data.into(),
        }
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

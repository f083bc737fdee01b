//! Content extraction and chunking for uploaded files

mod chunker;
mod parser;

pub use chunker::TextChunker;
pub use parser::{FileParser, ParsedDocument};

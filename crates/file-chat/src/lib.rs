//! file-chat: ask questions about an uploaded file with a hosted or local model
//!
//! A single-page web tool. Each browser session uploads a PDF, TXT, DOCX or CSV
//! file, picks Gemini or a local small model served by Ollama, and builds a
//! chat transcript that can be exported as `chat_history.txt`. The last answer
//! can be translated to Hindi. Files longer than 50,000 characters are chunked
//! and summarized before answering.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod session;
pub mod types;

pub use config::ChatConfig;
pub use error::{Error, Result};
pub use providers::{AnswerBackend, Backends};
pub use session::{InteractionHandler, SessionRegistry, SessionState};
pub use types::{
    chat::{ChatTurn, Transcript},
    document::{FileType, UploadedFile},
    query::{AnswerStyle, AskRequest, ModelChoice},
};

//! Core types for the file chat service

pub mod chat;
pub mod document;
pub mod query;
pub mod response;

pub use chat::{ChatTurn, Role, Transcript, EXPORT_FILENAME};
pub use document::{FileType, UploadedFile};
pub use query::{AnswerStyle, AskRequest, ModelChoice, OpenSessionRequest};
pub use response::{AskResponse, FileInfo, SessionView, TranslateResponse, UploadResponse};

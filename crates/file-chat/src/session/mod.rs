//! Per-session context, the registry holding it and the event handlers

mod handler;
mod registry;
mod state;

pub use handler::{ActiveContent, AskOutcome, InteractionHandler, SkipReason, UploadOutcome};
pub use registry::{SessionHandle, SessionRegistry};
pub use state::{SessionState, SUMMARY_ELLIPSIS};

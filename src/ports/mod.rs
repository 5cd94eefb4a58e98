//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (filesystem, text generation, shell).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod llm;
pub mod shell;

pub use filesystem::{DirEntry, EntryKind, FileSystem};
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient, Message};
pub use shell::{ShellExecutor, ShellOutput};

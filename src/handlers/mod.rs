//! External-service integrations.
//!
//! Both flows are thin wrappers around third-party services: note
//! summarization/rewriting against a local Ollama instance, and plain-text
//! uploads to Google Drive. Failures here are surfaced to the caller and
//! never touch workspace state.

pub mod ai;
pub mod drive;

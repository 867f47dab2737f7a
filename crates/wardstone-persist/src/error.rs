//! Error types for the `wardstone-persist` crate.

/// Errors that can occur while talking to a record backend.
///
/// Payload *content* problems are not errors: malformed records decode
/// to defaults (see [`crate::records`]). This type covers only transport
/// and storage failures, which callers log without rolling back the
/// in-memory state change that triggered the write.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The backing store rejected or failed an operation.
    #[error("record backend error: {message}")]
    Backend {
        /// Backend-specific description of the failure.
        message: String,
    },
}

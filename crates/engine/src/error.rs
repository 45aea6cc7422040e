/// Misuse of the assertion API by the calling test, as opposed to a failed
/// assertion about the system under test.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    /// A sequence-only operation received something else.
    #[error("{operation} requires a sequence, got {ty}")]
    NotASequence { operation: &'static str, ty: String },

    /// Strict equality was asked to compare a kind that has no intrinsic
    /// equality (sequences, mappings, functions, or records containing them).
    #[error("{ty} is not comparable with strict equality; use structural equality instead")]
    NotComparable { ty: String },

    /// A value could not be converted through serde.
    #[error("cannot inspect value: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for UsageError {
    fn from(e: serde_json::Error) -> Self {
        UsageError::Serialize(e.to_string())
    }
}

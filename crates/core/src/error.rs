use crate::collaborators::CollaboratorError;
use crate::validation::RequiredField;

#[derive(Debug, thiserror::Error)]
pub enum LetterError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("wizard step {0} is out of range (expected 1..=7)")]
    InvalidStep(u8),

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("unknown list entry: {0}")]
    UnknownEntry(String),

    #[error("entry index {index} is out of range for a list of {len}")]
    EntryIndexOutOfRange { index: usize, len: usize },

    #[error("unknown form field: {0}")]
    UnknownField(String),

    #[error("cannot {action} while the provider step is {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("letter is missing {} required field(s)", .0.len())]
    IncompleteLetter(Vec<RequiredField>),

    #[error("collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),
}

pub type LetterResult<T> = std::result::Result<T, LetterError>;

use crate::shared::completion::{CompletionError, CompletionRequestBuilderError};
use crate::shared::templates::TemplateError;
use thiserror::Error;

/// Reasons an action is refused before anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Groq API key is required. Pass --api-key or set GROQ_API_KEY.")]
    MissingCredential,
    #[error("{message}")]
    EmptyInput { message: &'static str },
    #[error("{message}")]
    NoOptionSelected { message: &'static str },
}

#[derive(Error, Debug)]
pub enum AssistError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error("Unable to build the completion request. {0}")]
    Request(#[from] CompletionRequestBuilderError),
}

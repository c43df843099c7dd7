use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("invalid grammar payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("invalid grammar notation at line {line}, column {column}: {message}")]
    InvalidNotation {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("empty non-terminal name")]
    EmptyNonTerminal,

    #[error("empty production for non-terminal {non_terminal}, write λ for the empty string")]
    EmptyProduction { non_terminal: String },

    #[error("productions set not found: {0}")]
    ProductionsSetNotFound(String),
}

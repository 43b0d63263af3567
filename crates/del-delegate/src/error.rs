//! Rule parsing errors

/// Error produced by strict rule-key parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("unterminated event list in rule `{0}`")]
    UnterminatedEventList(String),

    #[error("empty event list in rule `{0}`")]
    EmptyEventList(String),

    #[error("empty selector in rule `{0}`")]
    EmptySelector(String),
}

use thiserror::Error;

/// Raised while a dialect is being assembled. Parsing itself never fails.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("pattern for {element} does not compile: {source}")]
    InvalidPattern {
        element: String,
        #[source]
        source: regex::Error,
    },

    #[error("{element} declares {declared} capture groups but its pattern has {actual}")]
    GroupCountMismatch {
        element: String,
        declared: usize,
        actual: usize,
    },

    #[error("compiled alternation has {actual} capture groups, expected {expected}")]
    CompiledGroupMismatch { expected: usize, actual: usize },

    #[error("unbalanced guard group: {0}")]
    UnbalancedGroup(&'static str),

    #[error("guard prefix {prefix:?} is not a valid pattern: {source}")]
    InvalidGuard {
        prefix: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown dialect: {0}")]
    UnknownDialect(String),
}

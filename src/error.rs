use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Structural misuse of the network or its driver.
///
/// The numeric core never fails on its own; these errors are raised before
/// any arithmetic when sizes, sequences or configuration don't line up.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("layer sizes must be positive, got input={input} hidden={hidden} output={output}")]
    InvalidSize {
        input: usize,
        hidden: usize,
        output: usize,
    },

    #[error("initialization range is empty: [{lower}, {upper})")]
    InvalidRange { lower: f64, upper: f64 },

    #[error("{name} weights have shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("network expects {expected} input sequences, got {actual}")]
    InputCount { expected: usize, actual: usize },

    #[error("sequence has length {actual}, expected {expected}")]
    SequenceLength { expected: usize, actual: usize },

    #[error("sequence dimension must be at least 1")]
    EmptySequence,

    #[error("value {value} at position {position} is not a bit")]
    InvalidBit { position: usize, value: u8 },

    #[error("{value} does not fit in {width} bits")]
    ValueOutOfRange { value: u64, width: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

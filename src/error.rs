use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed input, detected before any enumeration or circuit work.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecificationError {
    #[error("specification must have at least one variable")]
    NoVariables,
    #[error("specification must have at least one function")]
    NoFunctions,
    #[error("expected {expected} terms (one per function), got {actual}")]
    TermCount { expected: usize, actual: usize },
    #[error("term {index} has length {actual}, expected {expected}")]
    TermLength {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown symbol {symbol:?} at position {position} (expected 0, 1 or x)")]
    UnknownSymbol { symbol: char, position: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TermError {
    #[error("term {term} has {term_len} positions but assignment has {assignment_len}")]
    LengthMismatch {
        term: String,
        term_len: usize,
        assignment_len: usize,
    },
    #[error("term {term} (function {function}) has no fixed positions")]
    NoFixedPositions { term: String, function: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitStructureError {
    #[error("circuit already has a mirrored half")]
    AlreadyMirrored,
    #[error("circuit has no mirrored half")]
    NotMirrored,
    #[error("circuit is already measured")]
    AlreadyMeasured,
    #[error("register {name} is missing")]
    MissingRegister { name: String },
    #[error("mirrored half has {mirrored} registers, original has {original}")]
    RegisterCountMismatch { original: usize, mirrored: usize },
    #[error(
        "mirrored register {mirrored} has size {mirrored_size}, \
         original {original} has size {original_size}"
    )]
    RegisterSizeMismatch {
        original: String,
        original_size: u32,
        mirrored: String,
        mirrored_size: u32,
    },
    #[error("mirrored half has {mirrored} gates, original has {original}")]
    GateCountMismatch { original: usize, mirrored: usize },
    #[error("expected {expected} oracle registers per half, found {actual}")]
    OracleCount { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("circuit has no classical measurement register")]
    NoMeasurements,
    #[error("qubit group of {qubits} qubits exceeds the limit of {limit}")]
    TooManyQubits { qubits: usize, limit: usize },
    #[error("at least one shot is required")]
    NoShots,
    #[error("invalid probability {value} for outcome {outcome}")]
    InvalidProbability { outcome: String, value: f64 },
    #[error("backend failure: {0}")]
    Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Specification(#[from] SpecificationError),
    #[error(transparent)]
    Term(#[from] TermError),
    #[error(transparent)]
    CircuitStructure(#[from] CircuitStructureError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

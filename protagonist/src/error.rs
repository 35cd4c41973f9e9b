// error.rs     Error definitions
//
// Copyright (c) 2022  Douglas Lau
//

/// Protagonist errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O {0}")]
    Io(#[from] std::io::Error),

    /// Table row too short for its shape parameters
    #[error("Invalid shape params: {kind} needs {expected}, found {found}")]
    ShapeParams {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    /// Material index out of palette range
    #[error("Invalid material index: {0}")]
    MaterialIndex(usize),

    /// Invalid revision code
    #[error("Invalid revision: {0}")]
    InvalidRevision(String),

    /// Unknown segment name
    #[error("Unknown segment: {0}")]
    UnknownSegment(String),
}

pub type Result<T> = std::result::Result<T, Error>;

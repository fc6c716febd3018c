use std::fmt;

use thiserror::Error;

/// Programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Fatal startup failures. Nothing after setup can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: Stage, log: String },
    #[error("shader program failed to link: {log}")]
    Link { log: String },
    #[error("failed to allocate {0}")]
    Allocation(&'static str),
    #[error("vertex attribute `{0}` is not active in the program")]
    MissingAttribute(String),
    #[error("bitmap has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BitmapSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("{0}")]
    Platform(String),
}

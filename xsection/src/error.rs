use dem::DemError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SectionError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("degenerate centerline segment {index}: consecutive vertices coincide")]
    DegenerateSegment { index: usize },

    #[error("bearing between coincident points is undefined")]
    UndefinedBearing,

    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("no cross-section matches {0}")]
    UnmatchedFile(PathBuf),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Dem(#[from] DemError),

    #[error("{0}")]
    Csv(#[from] csv::Error),
}

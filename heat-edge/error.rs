use heat_core::{EdgeId, EdgeLabel};

#[derive(Debug, Clone, PartialEq)]
pub enum EdgeError {
    /// Oracle scored more edges than the budget allows
    SubsetTooLarge { len: usize, budget: usize },
    /// Oracle subset size differs from the expected budget
    SubsetSizeMismatch { len: usize, expected: usize },
    /// Oracle output field has the wrong length
    ShapeMismatch { field: &'static str, expected: usize, actual: usize },
    EdgeIdOutOfRange { id: EdgeId, total: usize },
    DuplicateSubsetId(EdgeId),
    /// Oracle echo disagrees with a committed label
    LabelInvariant { id: EdgeId, committed: EdgeLabel, reported: EdgeLabel },
    CornerIndexOutOfRange { index: usize, corners: usize },
    /// Failure inside the scoring model itself
    Oracle(String),
}

impl std::fmt::Display for EdgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeError::SubsetTooLarge { len, budget } => {
                write!(f, "Oracle subset of {} edges exceeds budget {}", len, budget)
            }
            EdgeError::SubsetSizeMismatch { len, expected } => {
                write!(f, "Oracle subset of {} edges, expected {}", len, expected)
            }
            EdgeError::ShapeMismatch { field, expected, actual } => {
                write!(f, "Oracle output '{}' length mismatch: expected {}, got {}", field, expected, actual)
            }
            EdgeError::EdgeIdOutOfRange { id, total } => {
                write!(f, "Edge id {} out of range ({} candidates)", id, total)
            }
            EdgeError::DuplicateSubsetId(id) => {
                write!(f, "Edge id {} selected twice in one round", id)
            }
            EdgeError::LabelInvariant { id, committed, reported } => {
                write!(f, "Label of edge {} changed after commit: {:?} reported as {:?}", id, committed, reported)
            }
            EdgeError::CornerIndexOutOfRange { index, corners } => {
                write!(f, "Corner index {} out of range ({} corners)", index, corners)
            }
            EdgeError::Oracle(msg) => write!(f, "Edge oracle failed: {}", msg),
        }
    }
}

impl std::error::Error for EdgeError {}

pub type EdgeResult<T> = Result<T, EdgeError>;

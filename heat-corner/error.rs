#[derive(Debug, Clone, PartialEq)]
pub enum CornerError {
    InvalidMapSize { width: usize, height: usize },
    InvalidMapData { expected_len: usize, actual_len: usize },
    InvalidConfidence { x: usize, y: usize, value: f32 },
    InvalidNeighborhood(usize),
    InvalidRadius(f32),
}

impl std::fmt::Display for CornerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CornerError::InvalidMapSize { width, height } => {
                write!(f, "Invalid confidence map dimensions: {}x{} (must be > 0)", width, height)
            }
            CornerError::InvalidMapData { expected_len, actual_len } => {
                write!(f, "Confidence map length mismatch: expected {}, got {}", expected_len, actual_len)
            }
            CornerError::InvalidConfidence { x, y, value } => {
                write!(f, "Non-finite confidence {} at ({}, {})", value, x, y)
            }
            CornerError::InvalidNeighborhood(n) => {
                write!(f, "Invalid NMS neighborhood: {} (must be odd and >= 1)", n)
            }
            CornerError::InvalidRadius(r) => {
                write!(f, "Invalid NMS radius: {} (must be finite and > 0)", r)
            }
        }
    }
}

impl std::error::Error for CornerError {}

pub type CornerResult<T> = Result<T, CornerError>;

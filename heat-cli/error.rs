use heat_core::ConfigError;
use heat_corner::CornerError;
use heat_edge::EdgeError;

#[derive(Debug)]
pub enum HeatError {
    Config(ConfigError),
    Corner(CornerError),
    Edge(EdgeError),
    InvalidImage { expected_len: usize, actual_len: usize },
    /// Failure reported by the backbone or corner model
    Model(String),
}

impl std::fmt::Display for HeatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeatError::Config(e) => write!(f, "Configuration error: {}", e),
            HeatError::Corner(e) => write!(f, "Corner selection error: {}", e),
            HeatError::Edge(e) => write!(f, "Edge decoding error: {}", e),
            HeatError::InvalidImage { expected_len, actual_len } => {
                write!(f, "Image data length mismatch: expected {}, got {}", expected_len, actual_len)
            }
            HeatError::Model(msg) => write!(f, "Model error: {}", msg),
        }
    }
}

impl std::error::Error for HeatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HeatError::Config(e) => Some(e),
            HeatError::Corner(e) => Some(e),
            HeatError::Edge(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for HeatError {
    fn from(err: ConfigError) -> Self {
        HeatError::Config(err)
    }
}

impl From<CornerError> for HeatError {
    fn from(err: CornerError) -> Self {
        HeatError::Corner(err)
    }
}

impl From<EdgeError> for HeatError {
    fn from(err: EdgeError) -> Self {
        HeatError::Edge(err)
    }
}

pub type HeatResult<T> = Result<T, HeatError>;

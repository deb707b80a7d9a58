mod config;

pub use config::{ConfigError, HeatConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decision constants of the edge refinement loop. Not configurable.
pub mod constants {
    /// Minimum per-pixel confidence for a raw corner candidate
    pub const CORNER_THRESHOLD: f32 = 0.01;
    /// Positive commit threshold for rounds before the last
    pub const EARLY_POSITIVE_THRESHOLD: f32 = 0.9;
    /// Negative commit threshold for rounds before the last
    pub const EARLY_NEGATIVE_THRESHOLD: f32 = 0.01;
    /// Positive commit threshold for the last round
    pub const FINAL_POSITIVE_THRESHOLD: f32 = 0.5;
    /// Hard cap on oracle invocations per image
    pub const MAX_ROUNDS: usize = 3;
    /// Edges the oracle may score per call, per detected corner
    pub const BUDGET_PER_CORNER: usize = 3;
}

/// Row-major interleaved 8-bit image handed to the backbone
#[derive(Debug, Clone)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl Image {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Self {
        Self { width, height, channels, data }
    }

    /// Number of bytes the dimensions call for
    pub fn expected_len(&self) -> usize {
        self.width * self.height * self.channels
    }
}

/// Row-major per-pixel corner confidence in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl ConfidenceMap {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Self {
        Self { width, height, data }
    }

    pub fn zeros(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![0.0; width * height] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Corner candidate ≙ integer pixel position + detection confidence
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Corner {
    pub x: usize,
    pub y: usize,
    pub confidence: f32,
}

impl Corner {
    pub fn new(x: usize, y: usize, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    pub fn distance_sq(&self, other: &Corner) -> f32 {
        let dx = self.x as f32 - other.x as f32;
        let dy = self.y as f32 - other.y as f32;
        dx * dx + dy * dy
    }
}

/// Stable identifier of an edge candidate within one inference call
pub type EdgeId = usize;

/// Unordered corner pair, stored with `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CornerPair {
    pub a: usize,
    pub b: usize,
}

impl CornerPair {
    pub fn new(i: usize, j: usize) -> Self {
        if i <= j { Self { a: i, b: j } } else { Self { a: j, b: i } }
    }
}

/// Ternary classification state of one edge candidate.
///
/// `Positive` carries the confidence at commit time. Transitions only go
/// from `Unknown` to a decided state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeLabel {
    Unknown,
    Positive(f32),
    Negative,
}

impl EdgeLabel {
    pub fn is_unknown(&self) -> bool {
        matches!(self, EdgeLabel::Unknown)
    }

    pub fn is_decided(&self) -> bool {
        !self.is_unknown()
    }

    /// Integer code the scoring model expects: 0 negative, 1 positive, 2 unknown
    pub fn code(&self) -> u8 {
        match self {
            EdgeLabel::Negative => 0,
            EdgeLabel::Positive(_) => 1,
            EdgeLabel::Unknown => 2,
        }
    }

    /// Same decision, ignoring the recorded confidence
    pub fn same_state(&self, other: &EdgeLabel) -> bool {
        self.code() == other.code()
    }
}

/// Final decoded wireframe of one image
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wireframe {
    pub corners: Vec<(usize, usize)>,
    pub confidences: Vec<f32>,
    pub edges: Vec<(usize, usize)>,
    /// Confidence at commit time, aligned with `edges`
    pub edge_confidences: Vec<f32>,
}

impl Wireframe {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty() && self.edges.is_empty()
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_pair_is_unordered() {
        assert_eq!(CornerPair::new(4, 1), CornerPair::new(1, 4));
        let pair = CornerPair::new(7, 2);
        assert_eq!((pair.a, pair.b), (2, 7));
    }

    #[test]
    fn test_label_codes() {
        assert_eq!(EdgeLabel::Negative.code(), 0);
        assert_eq!(EdgeLabel::Positive(0.95).code(), 1);
        assert_eq!(EdgeLabel::Unknown.code(), 2);
        assert!(EdgeLabel::Positive(0.9).same_state(&EdgeLabel::Positive(0.99)));
        assert!(!EdgeLabel::Unknown.same_state(&EdgeLabel::Negative));
    }

    #[test]
    fn test_confidence_map_access() {
        let mut map = ConfidenceMap::zeros(4, 3);
        map.set(3, 2, 0.5);
        assert_eq!(map.get(3, 2), 0.5);
        assert_eq!(map.data[2 * 4 + 3], 0.5);
        assert_eq!(map.len(), 12);
    }

    #[test]
    fn test_corner_distance() {
        let a = Corner::new(0, 0, 0.5);
        let b = Corner::new(3, 4, 0.7);
        assert_eq!(a.distance_sq(&b), 25.0);
    }
}

use heat_core::{Corner, CornerPair, EdgeId};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Edge hypothesis between two corner candidates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeCandidate {
    pub id: EdgeId,
    pub pair: CornerPair,
    /// Pixel position of corner `pair.a`
    pub start: (usize, usize),
    /// Pixel position of corner `pair.b`
    pub end: (usize, usize),
}

impl EdgeCandidate {
    /// `n` evenly spaced points from `start` to `end`, both included
    pub fn sample_points(&self, n: usize) -> Vec<(f32, f32)> {
        let (x0, y0) = (self.start.0 as f32, self.start.1 as f32);
        let (x1, y1) = (self.end.0 as f32, self.end.1 as f32);
        match n {
            0 => Vec::new(),
            1 => vec![((x0 + x1) * 0.5, (y0 + y1) * 0.5)],
            _ => (0..n)
                .map(|i| {
                    let t = i as f32 / (n - 1) as f32;
                    (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t)
                })
                .collect(),
        }
    }

    /// Unordered endpoint key, smaller position first
    pub fn endpoint_key(&self) -> ((usize, usize), (usize, usize)) {
        let (p, q) = (self.start, self.end);
        if (p.1, p.0) <= (q.1, q.0) { (p, q) } else { (q, p) }
    }
}

/// Corners the candidates index into, together with the candidates.
///
/// `edges[i].id == i` for every candidate.
#[derive(Debug, Clone, Default)]
pub struct EdgeCandidates {
    pub corners: Vec<Corner>,
    pub edges: Vec<EdgeCandidate>,
}

impl EdgeCandidates {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn get(&self, id: EdgeId) -> Option<&EdgeCandidate> {
        self.edges.get(id)
    }
}

/// Builds the edge search space from corner candidates.
///
/// The returned corners may be reordered or truncated; every `CornerPair`
/// refers to the returned list.
pub trait EdgeCandidateBuilder {
    fn build(&self, corners: &[Corner]) -> EdgeCandidates;
}

/// Every unordered pair among the strongest `max_corners` corners
#[derive(Debug, Clone, Copy)]
pub struct PairwiseCandidateBuilder {
    max_corners: usize,
}

impl PairwiseCandidateBuilder {
    pub fn new(max_corners: usize) -> Self {
        Self { max_corners }
    }

    pub fn max_corners(&self) -> usize {
        self.max_corners
    }
}

impl Default for PairwiseCandidateBuilder {
    fn default() -> Self {
        Self::new(150)
    }
}

impl EdgeCandidateBuilder for PairwiseCandidateBuilder {
    fn build(&self, corners: &[Corner]) -> EdgeCandidates {
        let mut kept = corners.to_vec();
        kept.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if kept.len() > self.max_corners {
            debug!("PairwiseCandidateBuilder: truncating {} corners to {}", kept.len(), self.max_corners);
            kept.truncate(self.max_corners);
        }

        let n = kept.len();
        let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push(EdgeCandidate {
                    id: edges.len(),
                    pair: CornerPair::new(i, j),
                    start: (kept[i].x, kept[i].y),
                    end: (kept[j].x, kept[j].y),
                });
            }
        }

        EdgeCandidates { corners: kept, edges }
    }
}

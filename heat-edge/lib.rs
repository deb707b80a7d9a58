//! Edge decoding: build the candidate edge space from corners, classify it
//! over a bounded number of oracle rounds, and aggregate the positive edges
//! into a wireframe.

pub mod aggregator;
pub mod candidates;
pub mod cleanup;
pub mod error;
pub mod oracle;
pub mod table_oracle;
pub mod tracker;

use heat_core::{Corner, Wireframe};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use aggregator::{PositiveEdges, ResultAggregator};
pub use candidates::{EdgeCandidate, EdgeCandidateBuilder, EdgeCandidates, PairwiseCandidateBuilder};
pub use cleanup::{DegreeCleanup, GeometricCleanup, NoCleanup};
pub use error::{EdgeError, EdgeResult};
pub use oracle::{logits_for_probability, positive_probability, EdgeOracle, Logits, OracleOutput, OracleRequest};
pub use table_oracle::{EndpointKey, TableOracle};
pub use tracker::{DecodeTrace, EdgeStateTracker, RoundReport};

const DEFAULT_SEGMENT_SAMPLES: usize = 8;

/// Wireframe of one decoding call together with its round trace
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decoded {
    pub wireframe: Wireframe,
    pub trace: DecodeTrace,
}

/// Candidate builder → state tracker ⇄ oracle → aggregator → cleanup
pub struct EdgeDecoder {
    builder: Box<dyn EdgeCandidateBuilder>,
    cleanup: Box<dyn GeometricCleanup>,
    segment_samples: usize,
}

impl Default for EdgeDecoder {
    fn default() -> Self {
        Self::new(PairwiseCandidateBuilder::default(), DegreeCleanup)
    }
}

impl EdgeDecoder {
    pub fn new<B, C>(builder: B, cleanup: C) -> Self
    where
        B: EdgeCandidateBuilder + 'static,
        C: GeometricCleanup + 'static,
    {
        Self { builder: Box::new(builder), cleanup: Box::new(cleanup), segment_samples: DEFAULT_SEGMENT_SAMPLES }
    }

    /// Points sampled along each candidate for the oracle
    pub fn with_segment_samples(mut self, n: usize) -> Self {
        self.segment_samples = n;
        self
    }

    pub fn segment_samples(&self) -> usize {
        self.segment_samples
    }

    /// Enumerates the edge candidates for `corners`
    pub fn candidates(&self, corners: &[Corner]) -> EdgeCandidates {
        self.builder.build(corners)
    }

    /// Decodes the edges between `corners` using `oracle`
    pub fn decode<O: EdgeOracle + ?Sized>(&self, corners: &[Corner], oracle: &O) -> EdgeResult<Decoded> {
        let candidates = self.candidates(corners);
        self.decode_candidates(&candidates, oracle)
    }

    /// Decodes an already built candidate set
    pub fn decode_candidates<O: EdgeOracle + ?Sized>(
        &self,
        candidates: &EdgeCandidates,
        oracle: &O,
    ) -> EdgeResult<Decoded> {
        debug!(
            "EdgeDecoder: {} corners, {} edge candidates",
            candidates.corners.len(),
            candidates.len()
        );

        let mut tracker = EdgeStateTracker::new(candidates.len(), candidates.corners.len())
            .with_segment_samples(self.segment_samples);
        tracker.run(&candidates.edges, oracle)?;
        let (ledger, trace) = tracker.into_parts();

        let wireframe = ResultAggregator::aggregate(candidates, &ledger, self.cleanup.as_ref())?;
        Ok(Decoded { wireframe, trace })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_oracle() -> TableOracle {
        TableOracle::from_segments(
            [
                ((0, 0), (20, 0), 0.98),
                ((20, 0), (20, 20), 0.97),
                ((20, 20), (0, 20), 0.95),
                ((0, 20), (0, 0), 0.93),
            ],
            0.001,
        )
    }

    fn square_corners() -> Vec<Corner> {
        vec![
            Corner::new(0, 0, 0.9),
            Corner::new(20, 0, 0.8),
            Corner::new(20, 20, 0.7),
            Corner::new(0, 20, 0.6),
            Corner::new(40, 40, 0.2),
        ]
    }

    #[test]
    fn test_decodes_square() {
        let _ = env_logger::builder().is_test(true).try_init();
        let decoded = EdgeDecoder::default().decode(&square_corners(), &square_oracle()).unwrap();
        let wf = &decoded.wireframe;

        // Stray corner has no positive edge and is removed
        assert_eq!(wf.corners, vec![(0, 0), (20, 0), (20, 20), (0, 20)]);
        let mut edges = wf.edges.clone();
        edges.sort();
        assert_eq!(edges, vec![(0, 1), (0, 3), (1, 2), (2, 3)]);
        assert_eq!(wf.edge_confidences.len(), 4);
        // 5 corners -> budget 15 covers all 10 edges in one round
        assert_eq!(decoded.trace.oracle_calls(), 1);
    }

    #[test]
    fn test_no_corners() {
        let decoded = EdgeDecoder::default().decode(&[], &square_oracle()).unwrap();
        assert!(decoded.wireframe.is_empty());
        assert_eq!(decoded.trace.oracle_calls(), 0);
    }

    #[test]
    fn test_custom_cleanup_keeps_isolated_corners() {
        let decoder = EdgeDecoder::new(PairwiseCandidateBuilder::new(10), NoCleanup);
        let decoded = decoder.decode(&square_corners(), &square_oracle()).unwrap();
        assert_eq!(decoded.wireframe.corners.len(), 5);
        assert_eq!(decoded.wireframe.edges.len(), 4);
    }

    #[test]
    fn test_segment_samples_reach_oracle() {
        struct CountingSamples(TableOracle, std::cell::Cell<usize>);
        impl EdgeOracle for CountingSamples {
            fn score(&self, request: &OracleRequest<'_>) -> EdgeResult<OracleOutput> {
                self.1.set(request.segment(0).len());
                self.0.score(request)
            }
        }

        let oracle = CountingSamples(square_oracle(), std::cell::Cell::new(0));
        EdgeDecoder::default().decode(&square_corners(), &oracle).unwrap();
        assert_eq!(oracle.1.get(), 8);

        let decoder = EdgeDecoder::default().with_segment_samples(3);
        assert_eq!(decoder.segment_samples(), 3);
        decoder.decode(&square_corners(), &oracle).unwrap();
        assert_eq!(oracle.1.get(), 3);
    }
}

use std::collections::BTreeMap;

use heat_core::{Corner, CornerPair, EdgeId, Wireframe};
use log::debug;

use crate::candidates::EdgeCandidates;
use crate::cleanup::GeometricCleanup;
use crate::error::{EdgeError, EdgeResult};

/// Positive edges as aligned sequences: `pairs[i]` was committed with
/// `confidences[i]`. Ordered by ascending edge id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositiveEdges {
    pub ids: Vec<EdgeId>,
    pub pairs: Vec<CornerPair>,
    pub confidences: Vec<f32>,
}

impl PositiveEdges {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Turns the confidence ledger into the final wireframe
pub struct ResultAggregator;

impl ResultAggregator {
    /// Maps ledger entries to corner pairs.
    ///
    /// Ledger keys are unique, so each edge id appears at most once; a
    /// candidate pair listed under two ids is also emitted once.
    pub fn collect(candidates: &EdgeCandidates, ledger: &BTreeMap<EdgeId, f32>) -> EdgeResult<PositiveEdges> {
        let mut out = PositiveEdges::default();
        let mut seen_pairs = std::collections::HashSet::new();

        for (&id, &confidence) in ledger {
            let edge = candidates
                .get(id)
                .ok_or(EdgeError::EdgeIdOutOfRange { id, total: candidates.len() })?;
            if !seen_pairs.insert(edge.pair) {
                debug!("ResultAggregator: edge {} repeats pair {:?}, dropped", id, edge.pair);
                continue;
            }
            out.ids.push(id);
            out.pairs.push(edge.pair);
            out.confidences.push(confidence);
        }

        Ok(out)
    }

    /// Collects the ledger and hands it, with the corners, to `cleanup`
    pub fn aggregate<C: GeometricCleanup + ?Sized>(
        candidates: &EdgeCandidates,
        ledger: &BTreeMap<EdgeId, f32>,
        cleanup: &C,
    ) -> EdgeResult<Wireframe> {
        let positives = Self::collect(candidates, ledger)?;
        debug!(
            "ResultAggregator: {} positive edges over {} corners",
            positives.len(),
            candidates.corners.len()
        );
        cleanup.cleanup(&candidates.corners, &positives)
    }

    /// Wireframe without any cleanup, corners untouched
    pub fn to_wireframe(corners: &[Corner], positives: &PositiveEdges) -> Wireframe {
        Wireframe {
            corners: corners.iter().map(|c| (c.x, c.y)).collect(),
            confidences: corners.iter().map(|c| c.confidence).collect(),
            edges: positives.pairs.iter().map(|p| (p.a, p.b)).collect(),
            edge_confidences: positives.confidences.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::{EdgeCandidateBuilder, PairwiseCandidateBuilder};
    use crate::cleanup::NoCleanup;

    fn square() -> EdgeCandidates {
        let corners = vec![
            Corner::new(0, 0, 0.9),
            Corner::new(10, 0, 0.8),
            Corner::new(10, 10, 0.7),
            Corner::new(0, 10, 0.6),
        ];
        PairwiseCandidateBuilder::default().build(&corners)
    }

    #[test]
    fn test_aligned_sequences() {
        let cands = square();
        let ledger: BTreeMap<EdgeId, f32> = [(4, 0.91), (0, 0.97), (2, 0.95)].into_iter().collect();
        let positives = ResultAggregator::collect(&cands, &ledger).unwrap();
        assert_eq!(positives.ids, vec![0, 2, 4]);
        assert_eq!(positives.confidences, vec![0.97, 0.95, 0.91]);
        for (i, &id) in positives.ids.iter().enumerate() {
            assert_eq!(positives.pairs[i], cands.edges[id].pair);
        }
    }

    #[test]
    fn test_duplicate_pairs_collapse() {
        let mut cands = square();
        // Second id pointing at the pair of edge 0
        let mut dup = cands.edges[0];
        dup.id = cands.edges.len();
        cands.edges.push(dup);
        let ledger: BTreeMap<EdgeId, f32> = [(0, 0.95), (dup.id, 0.99)].into_iter().collect();
        let positives = ResultAggregator::collect(&cands, &ledger).unwrap();
        assert_eq!(positives.len(), 1);
        assert_eq!(positives.ids, vec![0]);
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let cands = square();
        let ledger: BTreeMap<EdgeId, f32> = [(42, 0.95)].into_iter().collect();
        assert_eq!(
            ResultAggregator::collect(&cands, &ledger),
            Err(EdgeError::EdgeIdOutOfRange { id: 42, total: 6 })
        );
    }

    #[test]
    fn test_aggregate_without_cleanup() {
        let cands = square();
        let ledger: BTreeMap<EdgeId, f32> = [(0, 0.95)].into_iter().collect();
        let wf = ResultAggregator::aggregate(&cands, &ledger, &NoCleanup).unwrap();
        assert_eq!(wf.corners.len(), 4);
        assert_eq!(wf.edges, vec![(0, 1)]);
        assert_eq!(wf.edge_confidences, vec![0.95]);
    }

    #[test]
    fn test_empty_ledger() {
        let wf = ResultAggregator::aggregate(&EdgeCandidates::default(), &BTreeMap::new(), &NoCleanup).unwrap();
        assert!(wf.is_empty());
    }
}

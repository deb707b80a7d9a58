use std::collections::HashMap;

use heat_core::EdgeId;

use crate::candidates::EdgeCandidate;
use crate::error::EdgeResult;
use crate::oracle::{logits_for_probability, EdgeOracle, OracleOutput, OracleRequest};

/// Unordered segment endpoints, as produced by `EdgeCandidate::endpoint_key`
pub type EndpointKey = ((usize, usize), (usize, usize));

/// Replays precomputed edge probabilities keyed by segment endpoints.
///
/// Selection follows the scoring model: the `budget` undecided edges with
/// the highest first-stage score, padded with masked decided edges when
/// fewer are undecided.
#[derive(Debug, Clone, Default)]
pub struct TableOracle {
    table: HashMap<EndpointKey, f32>,
    default_probability: f32,
}

impl TableOracle {
    pub fn new(default_probability: f32) -> Self {
        Self { table: HashMap::new(), default_probability }
    }

    pub fn from_segments<I>(segments: I, default_probability: f32) -> Self
    where
        I: IntoIterator<Item = ((usize, usize), (usize, usize), f32)>,
    {
        let mut oracle = Self::new(default_probability);
        for (p, q, prob) in segments {
            oracle.insert(p, q, prob);
        }
        oracle
    }

    pub fn insert(&mut self, p: (usize, usize), q: (usize, usize), probability: f32) {
        let key = if (p.1, p.0) <= (q.1, q.0) { (p, q) } else { (q, p) };
        self.table.insert(key, probability);
    }

    pub fn probability(&self, edge: &EdgeCandidate) -> f32 {
        self.table
            .get(&edge.endpoint_key())
            .copied()
            .unwrap_or(self.default_probability)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl EdgeOracle for TableOracle {
    fn score(&self, request: &OracleRequest<'_>) -> EdgeResult<OracleOutput> {
        let probs: Vec<f32> = request.candidates.iter().map(|e| self.probability(e)).collect();
        let total = probs.len();
        let budget = request.max_candidates.min(total);

        let mut unknown: Vec<EdgeId> = (0..total).filter(|&id| request.labels[id].is_unknown()).collect();
        unknown.sort_by(|&a, &b| {
            probs[b]
                .partial_cmp(&probs[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        unknown.truncate(budget);

        let mut selected = unknown;
        let mut subset_mask = vec![false; selected.len()];
        let padding: Vec<EdgeId> = (0..total)
            .filter(|&id| request.labels[id].is_decided())
            .take(budget - selected.len())
            .collect();
        subset_mask.extend(std::iter::repeat(true).take(padding.len()));
        selected.extend(padding);

        let hb_logits: Vec<_> = selected.iter().map(|&id| logits_for_probability(probs[id])).collect();

        Ok(OracleOutput {
            first_stage: probs.iter().map(|&p| logits_for_probability(p)).collect(),
            rel_logits: hb_logits.clone(),
            hb_logits,
            selected,
            subset_mask,
            labels: request.labels.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::{EdgeCandidateBuilder, PairwiseCandidateBuilder};
    use heat_core::{Corner, EdgeLabel};

    #[test]
    fn test_lookup_is_unordered() {
        let oracle = TableOracle::from_segments([((10, 0), (0, 0), 0.97)], 0.0);
        let cands = PairwiseCandidateBuilder::default().build(&[Corner::new(0, 0, 0.9), Corner::new(10, 0, 0.8)]);
        assert_eq!(oracle.probability(&cands.edges[0]), 0.97);
        assert_eq!(oracle.len(), 1);
    }

    #[test]
    fn test_selection_prefers_high_scores_and_pads() {
        let corners = vec![Corner::new(0, 0, 0.9), Corner::new(10, 0, 0.8), Corner::new(10, 10, 0.7)];
        let cands = PairwiseCandidateBuilder::default().build(&corners);
        // edges: 0=(0,1) 1=(0,2) 2=(1,2)
        let oracle = TableOracle::from_segments([((0, 0), (10, 10), 0.8), ((10, 0), (10, 10), 0.6)], 0.1);

        let labels = vec![EdgeLabel::Unknown; 3];
        let req = OracleRequest { round: 0, candidates: &cands.edges, labels: &labels, corner_count: 3, max_candidates: 2, segment_samples: 0, samples: &[] };
        let out = oracle.score(&req).unwrap();
        assert_eq!(out.selected, vec![1, 2]);
        assert_eq!(out.subset_mask, vec![false, false]);
        assert!(out.validate(&req).is_ok());

        let labels = vec![EdgeLabel::Negative, EdgeLabel::Unknown, EdgeLabel::Positive(0.9)];
        let req = OracleRequest { round: 1, candidates: &cands.edges, labels: &labels, corner_count: 3, max_candidates: 9, segment_samples: 0, samples: &[] };
        let out = oracle.score(&req).unwrap();
        assert_eq!(out.selected, vec![1, 0, 2]);
        assert_eq!(out.subset_mask, vec![false, true, true]);
        assert_eq!(out.labels, labels);
        assert!(out.validate(&req).is_ok());
    }
}

use heat_core::{EdgeId, EdgeLabel};

use crate::candidates::EdgeCandidate;
use crate::error::{EdgeError, EdgeResult};

/// Two-class logits, `[negative, positive]`
pub type Logits = [f32; 2];

/// Everything the scoring model sees in one round
#[derive(Debug, Clone, Copy)]
pub struct OracleRequest<'a> {
    pub round: usize,
    pub candidates: &'a [EdgeCandidate],
    pub labels: &'a [EdgeLabel],
    pub corner_count: usize,
    /// Maximum number of edges the oracle may score in this call
    pub max_candidates: usize,
    /// Points sampled along each candidate segment
    pub segment_samples: usize,
    /// `segment_samples` points per candidate, in candidate order
    pub samples: &'a [(f32, f32)],
}

impl<'a> OracleRequest<'a> {
    /// Exact subset size a well-formed answer has
    pub fn expected_subset_len(&self) -> usize {
        self.max_candidates.min(self.candidates.len())
    }

    /// Sampled points of candidate `id`, empty when sampling is off
    pub fn segment(&self, id: EdgeId) -> &'a [(f32, f32)] {
        let n = self.segment_samples;
        self.samples.get(id * n..(id + 1) * n).unwrap_or(&[])
    }
}

/// Scores returned by one oracle call.
///
/// `hb_logits`, `rel_logits` and `subset_mask` are aligned with `selected`;
/// `first_stage` and `labels` cover every candidate.
#[derive(Debug, Clone, Default)]
pub struct OracleOutput {
    pub first_stage: Vec<Logits>,
    /// High/both second-stage logits, the ones the tracker decides on
    pub hb_logits: Vec<Logits>,
    /// Relative second-stage logits, carried but not consumed
    pub rel_logits: Vec<Logits>,
    pub selected: Vec<EdgeId>,
    /// `true` flags entries excluded for structural reasons
    pub subset_mask: Vec<bool>,
    /// Echo of the label state as the oracle saw it
    pub labels: Vec<EdgeLabel>,
}

impl OracleOutput {
    pub fn subset_len(&self) -> usize {
        self.selected.len()
    }

    /// Checks the output against the request it answers
    pub fn validate(&self, request: &OracleRequest<'_>) -> EdgeResult<()> {
        let total = request.candidates.len();
        let subset = self.selected.len();

        for (field, actual) in [("first_stage", self.first_stage.len()), ("labels", self.labels.len())] {
            if actual != total {
                return Err(EdgeError::ShapeMismatch { field, expected: total, actual });
            }
        }

        if subset > request.max_candidates {
            return Err(EdgeError::SubsetTooLarge { len: subset, budget: request.max_candidates });
        }
        let expected = request.expected_subset_len();
        if subset != expected {
            return Err(EdgeError::SubsetSizeMismatch { len: subset, expected });
        }

        let checks: [(&'static str, usize); 3] = [
            ("hb_logits", self.hb_logits.len()),
            ("rel_logits", self.rel_logits.len()),
            ("subset_mask", self.subset_mask.len()),
        ];
        for (field, actual) in checks {
            if actual != subset {
                return Err(EdgeError::ShapeMismatch { field, expected: subset, actual });
            }
        }

        let mut seen = vec![false; total];
        for (&id, &masked) in self.selected.iter().zip(&self.subset_mask) {
            if id >= total {
                return Err(EdgeError::EdgeIdOutOfRange { id, total });
            }
            // Masked padding may repeat ids
            if !masked {
                if seen[id] {
                    return Err(EdgeError::DuplicateSubsetId(id));
                }
                seen[id] = true;
            }
        }

        Ok(())
    }
}

/// External edge-scoring model.
///
/// Pure function of its inputs: the same request yields the same output.
pub trait EdgeOracle {
    fn score(&self, request: &OracleRequest<'_>) -> EdgeResult<OracleOutput>;
}

/// Positive-class probability of a two-class logit pair (softmax)
#[inline]
pub fn positive_probability(logits: Logits) -> f32 {
    let [neg, pos] = logits;
    let m = neg.max(pos);
    let (en, ep) = ((neg - m).exp(), (pos - m).exp());
    ep / (en + ep)
}

/// Logit pair whose softmax yields `p` (clamped away from 0 and 1)
#[inline]
pub fn logits_for_probability(p: f32) -> Logits {
    let p = p.clamp(1e-6, 1.0 - 1e-6);
    [0.0, (p / (1.0 - p)).ln()]
}

use std::collections::BTreeMap;

use heat_core::constants::{
    BUDGET_PER_CORNER, EARLY_NEGATIVE_THRESHOLD, EARLY_POSITIVE_THRESHOLD, FINAL_POSITIVE_THRESHOLD,
    MAX_ROUNDS,
};
use heat_core::{EdgeId, EdgeLabel};
use log::{debug, warn};

use crate::candidates::EdgeCandidate;
use crate::error::{EdgeError, EdgeResult};
use crate::oracle::{positive_probability, EdgeOracle, OracleOutput, OracleRequest};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What one round of the refinement loop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundReport {
    pub round: usize,
    pub subset_size: usize,
    pub positives: usize,
    pub negatives: usize,
    pub unknown_remaining: usize,
    /// The loop stopped after this round before the round cap
    pub early_exit: bool,
}

/// Per-round record of one decoding call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecodeTrace {
    pub total_edges: usize,
    pub rounds: Vec<RoundReport>,
}

impl DecodeTrace {
    /// One oracle call per executed round
    pub fn oracle_calls(&self) -> usize {
        self.rounds.len()
    }

    pub fn terminated_early(&self) -> bool {
        self.rounds.last().map_or(false, |r| r.early_exit)
    }
}

/// Owns the ternary label of every edge candidate and the confidence
/// ledger, and drives the bounded oracle rounds.
///
/// Labels only move out of `Unknown`; a committed label is never revisited.
#[derive(Debug, Clone)]
pub struct EdgeStateTracker {
    labels: Vec<EdgeLabel>,
    ledger: BTreeMap<EdgeId, f32>,
    corner_count: usize,
    segment_samples: usize,
    trace: DecodeTrace,
}

impl EdgeStateTracker {
    pub fn new(edge_count: usize, corner_count: usize) -> Self {
        Self {
            labels: vec![EdgeLabel::Unknown; edge_count],
            ledger: BTreeMap::new(),
            corner_count,
            segment_samples: 0,
            trace: DecodeTrace { total_edges: edge_count, rounds: Vec::new() },
        }
    }

    /// Points sampled along every candidate and handed to the oracle
    pub fn with_segment_samples(mut self, n: usize) -> Self {
        self.segment_samples = n;
        self
    }

    /// Edges the oracle may score per call
    pub fn budget(&self) -> usize {
        self.corner_count * BUDGET_PER_CORNER
    }

    pub fn labels(&self) -> &[EdgeLabel] {
        &self.labels
    }

    pub fn label(&self, id: EdgeId) -> Option<EdgeLabel> {
        self.labels.get(id).copied()
    }

    pub fn unknown_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_unknown()).count()
    }

    /// Every edge committed positive with its confidence at commit time
    pub fn ledger(&self) -> &BTreeMap<EdgeId, f32> {
        &self.ledger
    }

    pub fn trace(&self) -> &DecodeTrace {
        &self.trace
    }

    pub fn into_parts(self) -> (BTreeMap<EdgeId, f32>, DecodeTrace) {
        (self.ledger, self.trace)
    }

    /// Runs up to `MAX_ROUNDS` oracle rounds over `candidates`.
    ///
    /// Performs no oracle call when there is nothing to classify.
    pub fn run<O: EdgeOracle + ?Sized>(&mut self, candidates: &[EdgeCandidate], oracle: &O) -> EdgeResult<()> {
        if candidates.len() != self.labels.len() {
            return Err(EdgeError::ShapeMismatch {
                field: "candidates",
                expected: self.labels.len(),
                actual: candidates.len(),
            });
        }
        if candidates.is_empty() || self.corner_count == 0 {
            debug!("EdgeStateTracker: no edge candidates, skipping oracle");
            return Ok(());
        }

        let samples: Vec<(f32, f32)> =
            candidates.iter().flat_map(|c| c.sample_points(self.segment_samples)).collect();

        for round in 0..MAX_ROUNDS {
            let request = OracleRequest {
                round,
                candidates,
                labels: &self.labels,
                corner_count: self.corner_count,
                max_candidates: self.budget(),
                segment_samples: self.segment_samples,
                samples: &samples,
            };
            let output = oracle.score(&request)?;
            output.validate(&request)?;
            self.check_echo(&output)?;

            let is_final = round + 1 == MAX_ROUNDS;
            let report = if is_final {
                self.apply_final_round(round, &output)
            } else {
                self.apply_early_round(round, &output)
            };

            debug!(
                "EdgeStateTracker: round {} scored {} of {} edges: +{} -{} ({} unknown)",
                round,
                report.subset_size,
                self.labels.len(),
                report.positives,
                report.negatives,
                report.unknown_remaining
            );
            self.trace.rounds.push(report);

            if report.early_exit {
                debug!("EdgeStateTracker: remaining unknown edges exceed oracle reach, stopping after round {}", round);
                break;
            }
        }

        Ok(())
    }

    /// Rejects an echo that reports a committed edge in another state
    fn check_echo(&self, output: &OracleOutput) -> EdgeResult<()> {
        for (id, (committed, reported)) in self.labels.iter().zip(&output.labels).enumerate() {
            if committed.is_decided() && !committed.same_state(reported) {
                return Err(EdgeError::LabelInvariant { id, committed: *committed, reported: *reported });
            }
            if committed.is_unknown() && reported.is_decided() {
                warn!("EdgeStateTracker: oracle reported undecided edge {} as {:?}, ignoring", id, reported);
            }
        }
        Ok(())
    }

    fn apply_early_round(&mut self, round: usize, output: &OracleOutput) -> RoundReport {
        let mut positives = 0;
        let mut negatives = 0;

        for (&id, &logits) in output.selected.iter().zip(&output.hb_logits) {
            if self.labels[id].is_decided() {
                continue;
            }
            let p = positive_probability(logits);
            if p >= EARLY_POSITIVE_THRESHOLD {
                self.commit_positive(id, p);
                positives += 1;
            } else if p <= EARLY_NEGATIVE_THRESHOLD {
                self.labels[id] = EdgeLabel::Negative;
                negatives += 1;
            }
        }

        let unknown_remaining = self.unknown_count();
        let not_covered = self.labels.len().saturating_sub(output.subset_len());

        RoundReport {
            round,
            subset_size: output.subset_len(),
            positives,
            negatives,
            unknown_remaining,
            early_exit: unknown_remaining <= not_covered,
        }
    }

    fn apply_final_round(&mut self, round: usize, output: &OracleOutput) -> RoundReport {
        let mut positives = 0;

        let entries = output.selected.iter().zip(&output.hb_logits).zip(&output.subset_mask);
        for ((&id, &logits), &masked) in entries {
            if masked || self.labels[id].is_decided() {
                continue;
            }
            let p = positive_probability(logits);
            if p >= FINAL_POSITIVE_THRESHOLD {
                self.commit_positive(id, p);
                positives += 1;
            }
        }

        RoundReport {
            round,
            subset_size: output.subset_len(),
            positives,
            negatives: 0,
            unknown_remaining: self.unknown_count(),
            early_exit: false,
        }
    }

    fn commit_positive(&mut self, id: EdgeId, confidence: f32) {
        self.labels[id] = EdgeLabel::Positive(confidence);
        self.ledger.entry(id).or_insert(confidence);
    }
}

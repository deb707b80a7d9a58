use heat_core::constants::CORNER_THRESHOLD;
use heat_core::{ConfidenceMap, Corner};
use log::debug;
use rayon::prelude::*;

use crate::config::SelectorConfig;
use crate::error::{CornerError, CornerResult};
use crate::nms::CornerSuppressor;

/// Thresholds a corner confidence map and deduplicates the survivors
pub struct CornerSelector {
    cfg: SelectorConfig,
    suppressor: Box<dyn CornerSuppressor>,
}

impl CornerSelector {
    /// Creates a selector with validation
    pub fn new(cfg: SelectorConfig) -> CornerResult<Self> {
        cfg.validate()?;
        let suppressor = cfg.nms.suppressor();
        Ok(Self { cfg, suppressor })
    }

    /// Creates a selector around a caller-provided deduplication pass
    pub fn with_suppressor(cfg: SelectorConfig, suppressor: Box<dyn CornerSuppressor>) -> Self {
        Self { cfg, suppressor }
    }

    fn validate_map(map: &ConfidenceMap) -> CornerResult<()> {
        if map.width == 0 || map.height == 0 {
            return Err(CornerError::InvalidMapSize { width: map.width, height: map.height });
        }
        let expected_len = map.width * map.height;
        if map.len() != expected_len {
            return Err(CornerError::InvalidMapData { expected_len, actual_len: map.len() });
        }
        Ok(())
    }

    /// Every pixel at or above the corner threshold, in row-major order
    pub fn raw_candidates(&self, map: &ConfidenceMap) -> CornerResult<Vec<Corner>> {
        Self::validate_map(map)?;

        let w = map.width;
        let rows: Vec<CornerResult<Vec<Corner>>> = (0..map.height)
            .into_par_iter()
            .map(|y| {
                let mut v = Vec::new();
                for (x, &score) in map.data[y * w..(y + 1) * w].iter().enumerate() {
                    if score.is_nan() {
                        return Err(CornerError::InvalidConfidence { x, y, value: score });
                    }
                    if score >= CORNER_THRESHOLD {
                        v.push(Corner::new(x, y, score));
                    }
                }
                Ok(v)
            })
            .collect();

        let mut candidates = Vec::new();
        for row in rows {
            candidates.extend(row?);
        }
        Ok(candidates)
    }

    /// Thresholded, deduplicated corner candidates.
    ///
    /// Deterministic for a given map. An all-background map yields an empty list.
    pub fn select(&self, map: &ConfidenceMap) -> CornerResult<Vec<Corner>> {
        let raw = self.raw_candidates(map)?;
        if raw.is_empty() {
            debug!("CornerSelector: no pixel reached {}", CORNER_THRESHOLD);
            return Ok(Vec::new());
        }

        let mut corners = self.suppressor.suppress(&raw, map.width, map.height);

        if let Some(cap) = self.cfg.max_corners {
            if corners.len() > cap {
                corners.sort_by(|a, b| {
                    b.confidence
                        .partial_cmp(&a.confidence)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                corners.truncate(cap);
            }
        }

        debug!(
            "CornerSelector: {} raw candidates -> {} corners ({}x{})",
            raw.len(),
            corners.len(),
            map.width,
            map.height
        );
        Ok(corners)
    }

    /// Get selector configuration
    pub fn config(&self) -> &SelectorConfig {
        &self.cfg
    }
}

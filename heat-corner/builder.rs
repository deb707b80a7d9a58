use heat_core::HeatConfig;
use crate::config::{NmsStrategy, SelectorConfig};
use crate::error::CornerResult;
use crate::selector::CornerSelector;

/// Builder for creating a `CornerSelector`
#[derive(Debug, Clone)]
pub struct SelectorBuilder {
    nms: NmsStrategy,
    max_corners: Option<usize>,
}

impl Default for SelectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorBuilder {
    /// Create a new builder with default settings (5x5 max-filter NMS)
    pub fn new() -> Self {
        Self::from_config(SelectorConfig::default())
    }

    /// Deduplicate with a square max filter of the given side
    pub fn max_filter(mut self, neighborhood: usize) -> Self {
        self.nms = NmsStrategy::MaxFilter { neighborhood };
        self
    }

    /// Deduplicate greedily within the given radius
    pub fn radius(mut self, radius: f32) -> Self {
        self.nms = NmsStrategy::Radius { radius };
        self
    }

    /// Skip deduplication entirely
    pub fn no_suppression(mut self) -> Self {
        self.nms = NmsStrategy::Disabled;
        self
    }

    /// Keep at most `n` corners, strongest first
    pub fn max_corners(mut self, n: usize) -> Self {
        self.max_corners = Some(n);
        self
    }

    /// Apply the NMS settings of a pipeline configuration
    pub fn heat_config(mut self, cfg: &HeatConfig) -> Self {
        self.nms = SelectorConfig::from_heat_config(cfg).nms;
        self
    }

    /// Build the `CornerSelector`
    pub fn build(self) -> CornerResult<CornerSelector> {
        CornerSelector::new(self.to_config())
    }

    pub fn summary(&self) -> String {
        self.clone().to_config().summary()
    }

    /// Create a builder from an existing `SelectorConfig`
    pub fn from_config(config: SelectorConfig) -> Self {
        Self {
            nms: config.nms,
            max_corners: config.max_corners,
        }
    }

    /// Convert the builder into a `SelectorConfig`
    pub fn to_config(self) -> SelectorConfig {
        SelectorConfig {
            nms: self.nms,
            max_corners: self.max_corners,
        }
    }
}

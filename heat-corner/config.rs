use heat_core::HeatConfig;
use crate::error::{CornerError, CornerResult};
use crate::nms::{CornerSuppressor, MaxFilterNms, NoSuppression, RadiusNms};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which deduplication pass runs after thresholding
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum NmsStrategy {
    MaxFilter { neighborhood: usize },
    Radius { radius: f32 },
    Disabled,
}

impl NmsStrategy {
    pub fn validate(&self) -> CornerResult<()> {
        match *self {
            NmsStrategy::MaxFilter { neighborhood } => {
                if neighborhood == 0 || neighborhood % 2 == 0 {
                    return Err(CornerError::InvalidNeighborhood(neighborhood));
                }
            }
            NmsStrategy::Radius { radius } => {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(CornerError::InvalidRadius(radius));
                }
            }
            NmsStrategy::Disabled => {}
        }
        Ok(())
    }

    pub(crate) fn suppressor(&self) -> Box<dyn CornerSuppressor> {
        match *self {
            NmsStrategy::MaxFilter { neighborhood } => Box::new(MaxFilterNms::new(neighborhood)),
            NmsStrategy::Radius { radius } => Box::new(RadiusNms::new(radius)),
            NmsStrategy::Disabled => Box::new(NoSuppression),
        }
    }
}

/// Corner selector settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectorConfig {
    pub nms: NmsStrategy,
    /// Keep only the strongest corners after NMS (`None` keeps all)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub max_corners: Option<usize>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            nms: NmsStrategy::MaxFilter { neighborhood: 5 },
            max_corners: None,
        }
    }
}

impl SelectorConfig {
    pub fn from_heat_config(cfg: &HeatConfig) -> Self {
        Self {
            nms: NmsStrategy::MaxFilter { neighborhood: cfg.nms_neighborhood },
            max_corners: None,
        }
    }

    pub fn validate(&self) -> CornerResult<()> {
        self.nms.validate()
    }

    pub fn summary(&self) -> String {
        format!("SelectorConfig: nms={:?}, max_corners={:?}", self.nms, self.max_corners)
    }
}

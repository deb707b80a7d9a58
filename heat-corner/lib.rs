//! Candidate corner selection: threshold a per-pixel corner confidence map,
//! then collapse near-duplicate responses into single corners.

pub mod builder;
pub mod config;
pub mod error;
pub mod nms;
pub mod positional;
pub mod selector;

pub use builder::SelectorBuilder;
pub use config::{NmsStrategy, SelectorConfig};
pub use error::{CornerError, CornerResult};
pub use nms::{CornerSuppressor, MaxFilterNms, NoSuppression, RadiusNms};
pub use positional::PixelGrid;
pub use selector::CornerSelector;

mod error;
pub mod io;
mod models;

use heat_core::{ConfidenceMap, HeatConfig, Image, Wireframe};
use heat_corner::{CornerSelector, PixelGrid, SelectorBuilder};
use heat_edge::{DegreeCleanup, EdgeDecoder, EdgeOracle, PairwiseCandidateBuilder};
use log::info;

pub use error::{HeatError, HeatResult};
pub use heat_edge::{DecodeTrace, Decoded};
pub use models::{Backbone, CornerModel, EdgeModel};
pub use {heat_core, heat_corner, heat_edge};

/// Everything after the neural models: corner selection, bounded edge
/// classification, aggregation and cleanup.
pub struct HeatDecoder {
    selector: CornerSelector,
    decoder: EdgeDecoder,
}

impl HeatDecoder {
    pub fn new(cfg: &HeatConfig) -> HeatResult<Self> {
        cfg.validate()?;
        let selector = SelectorBuilder::new().heat_config(cfg).build()?;
        let decoder = EdgeDecoder::new(PairwiseCandidateBuilder::new(cfg.max_corners), DegreeCleanup)
            .with_segment_samples(cfg.segment_samples);
        Ok(Self { selector, decoder })
    }

    /// Assemble from explicitly configured stages
    pub fn from_parts(selector: CornerSelector, decoder: EdgeDecoder) -> Self {
        Self { selector, decoder }
    }

    /// Decodes a corner confidence map with `oracle` scoring the edges
    pub fn decode<O: EdgeOracle + ?Sized>(&self, map: &ConfidenceMap, oracle: &O) -> HeatResult<Decoded> {
        let corners = self.selector.select(map)?;
        if corners.is_empty() {
            info!("HeatDecoder: no corner candidates, empty wireframe");
            return Ok(Decoded::default());
        }

        let decoded = self.decoder.decode(&corners, oracle)?;
        info!(
            "HeatDecoder: {} corners, {} edges after {} oracle rounds",
            decoded.wireframe.corners.len(),
            decoded.wireframe.edges.len(),
            decoded.trace.oracle_calls()
        );
        Ok(decoded)
    }

    pub fn selector(&self) -> &CornerSelector {
        &self.selector
    }
}

/// End-to-end wireframe inference: backbone, corner model, edge model and
/// the decoding stages around them
pub struct Heat<B, C, E> {
    config: HeatConfig,
    backbone: B,
    corner_model: C,
    edge_model: E,
    pixels: PixelGrid,
    decoder: HeatDecoder,
}

impl<B, C, E> Heat<B, C, E>
where
    B: Backbone,
    C: CornerModel<B::Features>,
    E: EdgeModel<B::Features>,
{
    /// Create a new pipeline with the given configuration and models
    pub fn new(config: HeatConfig, backbone: B, corner_model: C, edge_model: E) -> HeatResult<Self> {
        let decoder = HeatDecoder::new(&config)?;
        let pixels = PixelGrid::new(config.image_size, config.positional_dim);
        Ok(Self { config, backbone, corner_model, edge_model, pixels, decoder })
    }

    fn validate_image(image: &Image) -> HeatResult<()> {
        let expected_len = image.expected_len();
        if expected_len == 0 || image.data.len() != expected_len {
            return Err(HeatError::InvalidImage { expected_len, actual_len: image.data.len() });
        }
        Ok(())
    }

    /// Decode the wireframe of one image
    pub fn infer(&self, image: &Image) -> HeatResult<Wireframe> {
        Ok(self.infer_with_trace(image)?.wireframe)
    }

    /// Decode the wireframe of one image and report the executed rounds
    pub fn infer_with_trace(&self, image: &Image) -> HeatResult<Decoded> {
        Self::validate_image(image)?;

        let features = self.backbone.extract(image)?;
        let map = self.corner_model.predict(&features, &self.pixels)?;

        let oracle = models::BoundEdgeModel {
            model: &self.edge_model,
            features: &features,
            pixels: &self.pixels,
        };
        self.decoder.decode(&map, &oracle)
    }

    /// Get pipeline configuration
    pub fn config(&self) -> &HeatConfig {
        &self.config
    }

    pub fn pixels(&self) -> &PixelGrid {
        &self.pixels
    }
}

use heat_core::{ConfidenceMap, Image};
use heat_corner::PixelGrid;
use heat_edge::{EdgeOracle, EdgeResult, OracleOutput, OracleRequest, TableOracle};

use crate::error::HeatResult;

/// Convolutional feature extractor.
///
/// `Features` bundles whatever the scoring models consume (feature maps at
/// several resolutions, validity mask, full pyramid).
pub trait Backbone {
    type Features;
    fn extract(&self, image: &Image) -> HeatResult<Self::Features>;
}

/// Per-pixel corner scoring model
pub trait CornerModel<F> {
    fn predict(&self, features: &F, pixels: &PixelGrid) -> HeatResult<ConfidenceMap>;
}

/// Edge scoring model; becomes an [`EdgeOracle`] once bound to the
/// features of one image.
pub trait EdgeModel<F> {
    fn score(&self, features: &F, pixels: &PixelGrid, request: &OracleRequest<'_>) -> EdgeResult<OracleOutput>;
}

/// A precomputed table ignores image features
impl<F> EdgeModel<F> for TableOracle {
    fn score(&self, _features: &F, _pixels: &PixelGrid, request: &OracleRequest<'_>) -> EdgeResult<OracleOutput> {
        EdgeOracle::score(self, request)
    }
}

/// Edge model bound to one image's features
pub(crate) struct BoundEdgeModel<'a, M, F> {
    pub model: &'a M,
    pub features: &'a F,
    pub pixels: &'a PixelGrid,
}

impl<M: EdgeModel<F>, F> EdgeOracle for BoundEdgeModel<'_, M, F> {
    fn score(&self, request: &OracleRequest<'_>) -> EdgeResult<OracleOutput> {
        self.model.score(self.features, self.pixels, request)
    }
}

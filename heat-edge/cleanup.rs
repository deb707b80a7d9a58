use heat_core::{Corner, Wireframe};

use crate::aggregator::{PositiveEdges, ResultAggregator};
use crate::error::{EdgeError, EdgeResult};

/// Final corner/edge consistency pass
pub trait GeometricCleanup {
    fn cleanup(&self, corners: &[Corner], edges: &PositiveEdges) -> EdgeResult<Wireframe>;
}

/// Keeps every corner and edge as committed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCleanup;

impl GeometricCleanup for NoCleanup {
    fn cleanup(&self, corners: &[Corner], edges: &PositiveEdges) -> EdgeResult<Wireframe> {
        check_indices(corners.len(), edges)?;
        Ok(ResultAggregator::to_wireframe(corners, edges))
    }
}

/// Drops corners no positive edge touches and re-indexes the edges onto
/// the compacted corner list. Relative order is preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeCleanup;

impl GeometricCleanup for DegreeCleanup {
    fn cleanup(&self, corners: &[Corner], edges: &PositiveEdges) -> EdgeResult<Wireframe> {
        check_indices(corners.len(), edges)?;

        let mut degree = vec![0usize; corners.len()];
        for pair in &edges.pairs {
            degree[pair.a] += 1;
            degree[pair.b] += 1;
        }

        let mut remap = vec![usize::MAX; corners.len()];
        let mut kept = Vec::new();
        for (i, corner) in corners.iter().enumerate() {
            if degree[i] > 0 {
                remap[i] = kept.len();
                kept.push(*corner);
            }
        }

        Ok(Wireframe {
            corners: kept.iter().map(|c| (c.x, c.y)).collect(),
            confidences: kept.iter().map(|c| c.confidence).collect(),
            edges: edges.pairs.iter().map(|p| (remap[p.a], remap[p.b])).collect(),
            edge_confidences: edges.confidences.clone(),
        })
    }
}

fn check_indices(corner_count: usize, edges: &PositiveEdges) -> EdgeResult<()> {
    for pair in &edges.pairs {
        let index = pair.a.max(pair.b);
        if index >= corner_count {
            return Err(EdgeError::CornerIndexOutOfRange { index, corners: corner_count });
        }
    }
    Ok(())
}

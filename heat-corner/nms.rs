use heat_core::Corner;

/// Collapses spatially close corner candidates into single representatives.
///
/// `width`/`height` are the dimensions of the confidence map the corners
/// were read from.
pub trait CornerSuppressor: Send + Sync {
    fn suppress(&self, corners: &[Corner], width: usize, height: usize) -> Vec<Corner>;
}

/// Keeps a candidate iff it is the maximum of its square window and the
/// window is not flat. Survivors keep the input (row-major) order.
#[derive(Debug, Clone, Copy)]
pub struct MaxFilterNms {
    neighborhood: usize,
}

impl MaxFilterNms {
    pub fn new(neighborhood: usize) -> Self {
        Self { neighborhood }
    }

    pub fn neighborhood(&self) -> usize {
        self.neighborhood
    }
}

impl Default for MaxFilterNms {
    fn default() -> Self {
        Self::new(5)
    }
}

impl CornerSuppressor for MaxFilterNms {
    fn suppress(&self, corners: &[Corner], width: usize, height: usize) -> Vec<Corner> {
        if corners.is_empty() || width == 0 || height == 0 {
            return Vec::new();
        }

        // Scatter into a dense grid; a later duplicate position overwrites
        let mut grid = vec![0.0f32; width * height];
        for c in corners {
            if c.x < width && c.y < height {
                grid[c.y * width + c.x] = c.confidence;
            }
        }

        let half = self.neighborhood / 2;
        let mut kept = Vec::new();
        let mut seen = vec![false; width * height];

        for c in corners {
            if c.x >= width || c.y >= height {
                continue;
            }
            let idx = c.y * width + c.x;
            if seen[idx] {
                continue;
            }
            seen[idx] = true;

            let value = grid[idx];
            let (x0, x1) = (c.x.saturating_sub(half), (c.x + half).min(width - 1));
            let (y0, y1) = (c.y.saturating_sub(half), (c.y + half).min(height - 1));

            let mut window_max = f32::NEG_INFINITY;
            let mut window_min = f32::INFINITY;
            for y in y0..=y1 {
                let row = &grid[y * width + x0..=y * width + x1];
                for &v in row {
                    window_max = window_max.max(v);
                    window_min = window_min.min(v);
                }
            }

            if value == window_max && window_max - window_min > 0.0 {
                kept.push(Corner::new(c.x, c.y, value));
            }
        }

        kept
    }
}

/// Greedy suppression: strongest first, reject anything within `radius` of
/// an accepted corner.
#[derive(Debug, Clone, Copy)]
pub struct RadiusNms {
    radius: f32,
}

impl RadiusNms {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl CornerSuppressor for RadiusNms {
    fn suppress(&self, corners: &[Corner], _width: usize, _height: usize) -> Vec<Corner> {
        if corners.is_empty() {
            return Vec::new();
        }

        // Stable sort keeps row-major order among equal confidences
        let mut sorted = corners.to_vec();
        sorted.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let min_distance_sq = self.radius * self.radius;
        let mut accepted: Vec<Corner> = Vec::new();

        for candidate in sorted {
            let is_local_max = accepted
                .iter()
                .all(|existing| candidate.distance_sq(existing) >= min_distance_sq);
            if is_local_max {
                accepted.push(candidate);
            }
        }

        accepted
    }
}

/// Pass-through, for inputs that are already sparse
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuppression;

impl CornerSuppressor for NoSuppression {
    fn suppress(&self, corners: &[Corner], _width: usize, _height: usize) -> Vec<Corner> {
        corners.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(cx: usize, cy: usize, peak: f32) -> Vec<Corner> {
        let mut v = Vec::new();
        for y in cy - 1..=cy + 1 {
            for x in cx - 1..=cx + 1 {
                let conf = if (x, y) == (cx, cy) { peak } else { peak * 0.5 };
                v.push(Corner::new(x, y, conf));
            }
        }
        v
    }

    #[test]
    fn test_max_filter_keeps_blob_peak() {
        let corners = blob(10, 10, 0.8);
        let kept = MaxFilterNms::default().suppress(&corners, 32, 32);
        assert_eq!(kept, vec![Corner::new(10, 10, 0.8)]);
    }

    #[test]
    fn test_max_filter_separates_distant_blobs() {
        let mut corners = blob(5, 5, 0.6);
        corners.extend(blob(20, 20, 0.9));
        corners.sort_by_key(|c| (c.y, c.x));
        let kept = MaxFilterNms::new(5).suppress(&corners, 32, 32);
        assert_eq!(kept, vec![Corner::new(5, 5, 0.6), Corner::new(20, 20, 0.9)]);
    }

    #[test]
    fn test_max_filter_rejects_flat_window() {
        // Every pixel of the 3x3 window carries the same value
        let corners: Vec<Corner> = (0..3)
            .flat_map(|y| (0..3).map(move |x| Corner::new(x, y, 0.5)))
            .collect();
        let kept = MaxFilterNms::new(3).suppress(&corners, 3, 3);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_max_filter_handles_border() {
        let corners = vec![Corner::new(0, 0, 0.7), Corner::new(1, 0, 0.2)];
        let kept = MaxFilterNms::new(5).suppress(&corners, 8, 8);
        assert_eq!(kept, vec![Corner::new(0, 0, 0.7)]);
    }

    #[test]
    fn test_radius_nms_min_distance() {
        let corners = vec![
            Corner::new(10, 10, 0.5),
            Corner::new(11, 10, 0.9),
            Corner::new(30, 30, 0.4),
        ];
        let kept = RadiusNms::new(5.0).suppress(&corners, 64, 64);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0], Corner::new(11, 10, 0.9));
        for i in 0..kept.len() {
            for j in (i + 1)..kept.len() {
                assert!(kept[i].distance_sq(&kept[j]) >= 25.0);
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(MaxFilterNms::default().suppress(&[], 16, 16).is_empty());
        assert!(RadiusNms::new(3.0).suppress(&[], 16, 16).is_empty());
        assert!(NoSuppression.suppress(&[], 16, 16).is_empty());
    }
}

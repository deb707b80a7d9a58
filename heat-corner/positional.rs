use std::f32::consts::PI;

const TEMPERATURE: f32 = 10000.0;

/// Pixel coordinate grid with a sinusoidal positional feature per pixel.
///
/// Features are stored row-major, `dim` floats per pixel: the first half
/// encodes `y`, the second half `x`, alternating sin/cos per frequency.
#[derive(Debug, Clone)]
pub struct PixelGrid {
    pub size: usize,
    pub dim: usize,
    pub pixels: Vec<(usize, usize)>,
    pub features: Vec<f32>,
}

impl PixelGrid {
    pub fn new(size: usize, dim: usize) -> Self {
        let half = dim / 2;
        let freqs: Vec<f32> = (0..half)
            .map(|i| TEMPERATURE.powf(2.0 * (i / 2) as f32 / half.max(1) as f32))
            .collect();

        let encode = |coord: usize, out: &mut Vec<f32>| {
            // Cumulative position 1..=size normalized onto (0, 2π]
            let t = (coord + 1) as f32 / size as f32 * 2.0 * PI;
            for (i, f) in freqs.iter().enumerate() {
                let v = t / f;
                out.push(if i % 2 == 0 { v.sin() } else { v.cos() });
            }
        };

        let mut pixels = Vec::with_capacity(size * size);
        let mut features = Vec::with_capacity(size * size * dim);
        for y in 0..size {
            for x in 0..size {
                pixels.push((x, y));
                encode(y, &mut features);
                encode(x, &mut features);
                // Odd dims leave one zero channel
                for _ in 2 * half..dim {
                    features.push(0.0);
                }
            }
        }

        Self { size, dim, pixels, features }
    }

    /// Positional feature of one pixel
    pub fn feature(&self, x: usize, y: usize) -> &[f32] {
        let start = (y * self.size + x) * self.dim;
        &self.features[start..start + self.dim]
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout() {
        let grid = PixelGrid::new(4, 8);
        assert_eq!(grid.len(), 16);
        assert_eq!(grid.features.len(), 16 * 8);
        assert_eq!(grid.pixels[5], (1, 1));
        assert_eq!(grid.feature(3, 2).len(), 8);
    }

    #[test]
    fn test_features_bounded_and_distinct() {
        let grid = PixelGrid::new(8, 16);
        assert!(grid.features.iter().all(|v| v.is_finite() && v.abs() <= 1.0));
        assert_ne!(grid.feature(1, 0), grid.feature(0, 1));
        // y half of two pixels on the same row matches
        assert_eq!(&grid.feature(2, 3)[..8], &grid.feature(5, 3)[..8]);
    }
}

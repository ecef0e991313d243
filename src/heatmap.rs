use crate::config::{HeatmapConfig, HeatmapDecay, HeatmapKernel};
use crate::error::Error;
use crate::math;
use nalgebra as na;
use ndarray::prelude::*;
use serde_derive::Serialize;

/// Normalized, read-only copy of the heatmap, `0..=255` scaled to the hottest cell.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HeatmapView {
    pub cell_size: u32,
    /// `(rows, cols)` indexed as `[y, x]`.
    pub data: Array2<u8>,
}

impl HeatmapView {
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        self.data.dim()
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        self.data.get((row, col)).copied()
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }
}

/// Spatial density grid over the frame, fixed in size for the whole session.
#[derive(Debug, Clone)]
pub struct Heatmap {
    cell_size: u32,
    kernel: HeatmapKernel,
    decay: HeatmapDecay,
    weights: Array2<f32>,
}

impl Heatmap {
    pub fn new(frame_width: u32, frame_height: u32, config: &HeatmapConfig) -> Result<Self, Error> {
        config.validate()?;

        if frame_width == 0 || frame_height == 0 {
            return Err(Error::config(
                "frame_width/frame_height",
                format!("frame must not be empty, got {}x{}", frame_width, frame_height),
            ));
        }

        let (rows, cols) = config.grid_dims(frame_width, frame_height)?;

        Ok(Self {
            cell_size: config.cell_size,
            kernel: config.kernel,
            decay: config.decay,
            weights: Array2::zeros((rows, cols)),
        })
    }

    /// Grid `(rows, cols)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        self.weights.dim()
    }

    #[inline]
    pub fn weights(&self) -> ArrayView2<'_, f32> {
        self.weights.view()
    }

    pub fn max_weight(&self) -> f32 {
        self.weights.iter().copied().fold(0.0, f32::max)
    }

    /// Grid cell `(col, row)` containing `p`, clamped to the grid.
    pub fn cell_of(&self, p: &na::Point2<f32>) -> (usize, usize) {
        let (rows, cols) = self.dims();
        let cs = self.cell_size as f32;

        let col = (p.x / cs).floor().max(0.0) as usize;
        let row = (p.y / cs).floor().max(0.0) as usize;

        (col.min(cols - 1), row.min(rows - 1))
    }

    /// Applies one tick of decay; no-op for cumulative heatmaps.
    pub fn decay(&mut self) {
        if let HeatmapDecay::Exponential { factor } = self.decay {
            self.weights.mapv_inplace(|w| w * factor);
        }
    }

    pub fn record(&mut self, p: &na::Point2<f32>) {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return;
        }

        let (col, row) = self.cell_of(p);

        match self.kernel {
            HeatmapKernel::Cell => self.weights[(row, col)] += 1.0,
            HeatmapKernel::Gaussian { radius, sigma } => self.splat(col, row, radius, sigma),
        }
    }

    fn splat(&mut self, col: usize, row: usize, radius: u32, sigma: f32) {
        let (rows, cols) = self.dims();
        let r = radius as usize;

        let (c0, c1) = (col.saturating_sub(r), (col + r).min(cols - 1));
        let (r0, r1) = (row.saturating_sub(r), (row + r).min(rows - 1));

        let mut window = self.weights.slice_mut(s![r0..=r1, c0..=c1]);
        for ((y, x), w) in window.indexed_iter_mut() {
            let dx = (c0 + x) as f32 - col as f32;
            let dy = (r0 + y) as f32 - row as f32;

            *w += math::gauss((dx * dx + dy * dy).sqrt(), sigma);
        }
    }

    /// Normalized copy; leaves accumulated weights untouched.
    pub fn export(&self) -> HeatmapView {
        let max = self.max_weight();

        let data = if max > 0.0 {
            self.weights
                .mapv(|w| ((w / max).clamp(0.0, 1.0) * 255.0).round() as u8)
        } else {
            Array2::zeros(self.dims())
        };

        HeatmapView {
            cell_size: self.cell_size,
            data,
        }
    }

    pub fn reset(&mut self) {
        self.weights.fill(0.0);
    }
}

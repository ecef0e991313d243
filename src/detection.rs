use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltrb};
use nalgebra as na;

/// One object found in a single frame by the external detector.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub bbox: BBox<Ltrb>,
    #[serde(rename = "p")]
    pub confidence: f32,
    #[serde(rename = "c", default)]
    pub class: i32,
}

impl Detection {
    #[inline]
    pub fn new(bbox: BBox<Ltrb>, class: i32, confidence: f32) -> Self {
        Self {
            bbox,
            confidence,
            class,
        }
    }

    /// Shorthand for a class-0, fully confident detection.
    #[inline]
    pub fn ltrb(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self::new(BBox::ltrb(xmin, ymin, xmax, ymax), 0, 1.0)
    }

    #[inline(always)]
    pub fn centroid(&self) -> na::Point2<f32> {
        self.bbox.centroid()
    }
}

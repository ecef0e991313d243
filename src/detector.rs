//! Boundary to the external object detector. Inference itself lives outside this crate;
//! detections reach the tracker already filtered by confidence and class.

use crate::detection::Detection;
use serde_derive::{Deserialize, Serialize};

pub trait Detector {
    type Frame: ?Sized;
    type Error;

    fn detect(&mut self, frame: &Self::Frame) -> Result<Vec<Detection>, Self::Error>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    pub confidence_threshold: f32,
    /// Classes to keep, all when `None`.
    pub classes: Option<Vec<i32>>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            classes: None,
        }
    }
}

impl DetectorConfig {
    pub fn new(confidence_threshold: f32, classes: Vec<i32>) -> Self {
        Self {
            confidence_threshold,
            classes: Some(classes),
        }
    }

    #[inline]
    pub fn accepts(&self, det: &Detection) -> bool {
        det.confidence >= self.confidence_threshold
            && self
                .classes
                .as_ref()
                .map_or(true, |classes| classes.contains(&det.class))
    }

    pub fn filter(&self, mut dets: Vec<Detection>) -> Vec<Detection> {
        dets.retain(|d| self.accepts(d));
        dets
    }
}

/// Runs `detector` and applies `config` to its output.
pub struct Filtered<D> {
    pub detector: D,
    pub config: DetectorConfig,
}

impl<D: Detector> Detector for Filtered<D> {
    type Frame = D::Frame;
    type Error = D::Error;

    fn detect(&mut self, frame: &Self::Frame) -> Result<Vec<Detection>, Self::Error> {
        Ok(self.config.filter(self.detector.detect(frame)?))
    }
}

pub mod association;
pub mod bbox;
pub mod config;
pub mod detection;
pub mod detector;
pub mod error;
pub mod heatmap;
pub mod math;
pub mod pipeline;
pub mod scene;
pub mod trajectory;

mod circular_queue;
mod track;

pub use config::{HeatmapConfig, HeatmapDecay, HeatmapKernel, TrackerConfig, TrajectoryRetention};
pub use detection::Detection;
pub use error::{Error, InvalidDetection};
pub use heatmap::HeatmapView;
pub use pipeline::{Pipeline, PipelineStats};
pub use track::{Track, TrackId, TrackSnapshot, TrackState};

/// A per-frame tracker. One `tick` must complete before the next begins.
pub trait Tracking {
    fn tick(&mut self, detections: &[Detection]) -> TrackSnapshot;
    fn reset(&mut self);
    fn stats(&self) -> PipelineStats;
}

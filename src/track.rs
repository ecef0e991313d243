use crate::bbox::{BBox, Ltrb};
use crate::heatmap::HeatmapView;
use crate::Detection;
use nalgebra as na;
use serde_derive::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Session-unique track identity, allocated from 1 upwards and never reused.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Matched on the current tick.
    Active,
    /// Missed on the current tick, still eligible for matching.
    Lost,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub centroid: na::Point2<f32>,
    pub last_box: BBox<Ltrb>,
    pub age_since_seen: u32,
    pub state: TrackState,
    pub class: i32,
    pub confidence: f32,
}

impl Track {
    pub(crate) fn new(id: TrackId, det: &Detection) -> Self {
        Self {
            id,
            centroid: det.centroid(),
            last_box: det.bbox,
            age_since_seen: 0,
            state: TrackState::Active,
            class: det.class,
            confidence: det.confidence,
        }
    }

    pub(crate) fn hit(&mut self, det: &Detection) {
        self.centroid = det.centroid();
        self.last_box = det.bbox;
        self.class = det.class;
        self.confidence = det.confidence;
        self.age_since_seen = 0;
        self.state = TrackState::Active;
    }

    pub(crate) fn miss(&mut self) {
        self.age_since_seen = self.age_since_seen.saturating_add(1);
        self.state = TrackState::Lost;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == TrackState::Active
    }
}

/// Immutable, independently owned result of one tick.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
    /// 1-based index of the tick that produced this snapshot.
    pub frame: u64,
    /// Live tracks ordered by id.
    pub tracks: Vec<Track>,
    /// Oldest to newest centroids for every live track.
    pub trajectories: BTreeMap<TrackId, Vec<na::Point2<f32>>>,
    pub heatmap: Arc<HeatmapView>,
    /// Detections dropped by validation on this tick.
    pub rejected: usize,
}

impl TrackSnapshot {
    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks
            .binary_search_by_key(&id, |t| t.id)
            .ok()
            .map(|idx| &self.tracks[idx])
    }

    #[inline]
    pub fn trajectory(&self, id: TrackId) -> Option<&[na::Point2<f32>]> {
        self.trajectories.get(&id).map(Vec::as_slice)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

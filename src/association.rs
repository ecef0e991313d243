//! Greedy nearest-centroid matching between a frame's detections and known tracks.

use crate::math;
use crate::track::{Track, TrackId};
use crate::Detection;
use log::trace;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Association {
    /// `(detection index, track id, centroid distance)` in commit order.
    pub matched: Vec<(usize, TrackId, f32)>,
    /// Ascending detection indexes.
    pub unmatched_detections: Vec<usize>,
    /// Ascending track ids.
    pub unmatched_tracks: Vec<TrackId>,
}

impl Association {
    pub fn track_for(&self, det_idx: usize) -> Option<TrackId> {
        self.matched
            .iter()
            .find(|(d, _, _)| *d == det_idx)
            .map(|(_, t, _)| *t)
    }
}

/// Commits `(detection, track)` pairs in ascending distance order, skipping pairs farther than
/// `max_distance` or touching an already committed side. Equal distances resolve to the lower
/// detection index, then the lower track id.
pub(crate) fn associate<'a, I>(
    detections: &[Detection],
    tracks: I,
    max_distance: f32,
) -> Association
where
    I: IntoIterator<Item = &'a Track>,
{
    let mut tracks: Vec<(TrackId, nalgebra::Point2<f32>)> =
        tracks.into_iter().map(|t| (t.id, t.centroid)).collect();
    tracks.sort_by_key(|(id, _)| *id);

    let centroids: Vec<_> = detections.iter().map(Detection::centroid).collect();

    let mut pairs = Vec::with_capacity(centroids.len() * tracks.len());
    for (det_idx, c) in centroids.iter().enumerate() {
        for (track_idx, (_, pos)) in tracks.iter().enumerate() {
            let dist = math::distance(c, pos);

            if dist.is_finite() && dist <= max_distance {
                pairs.push((dist, det_idx, track_idx));
            }
        }
    }

    pairs.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    let mut det_taken = vec![false; detections.len()];
    let mut track_taken = vec![false; tracks.len()];
    let mut matched = Vec::new();

    for (dist, det_idx, track_idx) in pairs {
        if det_taken[det_idx] || track_taken[track_idx] {
            continue;
        }

        det_taken[det_idx] = true;
        track_taken[track_idx] = true;

        let id = tracks[track_idx].0;
        trace!("det #{} -> track {} ({:.2}px)", det_idx, id, dist);
        matched.push((det_idx, id, dist));
    }

    let unmatched_detections = det_taken
        .iter()
        .enumerate()
        .filter(|(_, taken)| !**taken)
        .map(|(idx, _)| idx)
        .collect();

    let unmatched_tracks = track_taken
        .iter()
        .zip(tracks.iter())
        .filter(|(taken, _)| !**taken)
        .map(|(_, (id, _))| *id)
        .collect();

    Association {
        matched,
        unmatched_detections,
        unmatched_tracks,
    }
}

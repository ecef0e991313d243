use crate::association::{associate, Association};
use crate::track::{Track, TrackId};
use crate::Detection;
use log::debug;
use std::collections::BTreeMap;

pub struct DetectionsMapping<'a> {
    detections: &'a [Detection],
    association: Association,
}

impl<'a> DetectionsMapping<'a> {
    #[inline]
    pub fn association(&self) -> &Association {
        &self.association
    }
}

/// Ids touched by one [`Scene::update`], ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneChanges {
    pub created: Vec<TrackId>,
    pub retired: Vec<TrackId>,
}

/// Live-track arena. Owns every track, allocates ids and drives the
/// `Active -> Lost -> retired` lifecycle from association results.
#[derive(Debug, Clone)]
pub struct Scene {
    tracks: BTreeMap<TrackId, Track>,
    next_id: u64,
    max_disappeared: u32,
    max_distance: f32,
}

impl Scene {
    /// `max_distance` must be finite and positive, `TrackerConfig::validate` checks it.
    pub(crate) fn new(max_disappeared: u32, max_distance: f32) -> Self {
        Self {
            tracks: BTreeMap::new(),
            next_id: 1,
            max_disappeared,
            max_distance,
        }
    }

    pub fn map_detections<'a>(&self, detections: &'a [Detection]) -> DetectionsMapping<'a> {
        DetectionsMapping {
            detections,
            association: associate(detections, self.tracks.values(), self.max_distance),
        }
    }

    pub fn update(&mut self, mapping: DetectionsMapping<'_>) -> SceneChanges {
        let dets = mapping.detections;
        let Association {
            matched,
            unmatched_detections,
            unmatched_tracks,
        } = mapping.association;

        let mut changes = SceneChanges::default();

        for (j, id, _) in matched {
            if let Some(track) = self.tracks.get_mut(&id) {
                track.hit(&dets[j]);
            }
        }

        for id in unmatched_tracks {
            let retire = match self.tracks.get_mut(&id) {
                Some(track) => {
                    track.miss();
                    track.age_since_seen > self.max_disappeared
                }
                None => false,
            };

            if retire {
                self.tracks.remove(&id);
                debug!("track {} retired", id);
                changes.retired.push(id);
            }
        }

        for j in unmatched_detections {
            let id = self.allocate_id();
            let track = Track::new(id, &dets[j]);

            debug!(
                "track {} born at ({:.1}, {:.1})",
                id, track.centroid.x, track.centroid.y
            );

            self.tracks.insert(id, track);
            changes.created.push(id);
        }

        changes
    }

    fn allocate_id(&mut self) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Live tracks ordered by id.
    #[inline]
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    #[inline]
    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Total ids handed out this session.
    #[inline]
    pub fn tracks_created(&self) -> u64 {
        self.next_id - 1
    }

    pub fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 1;
    }
}

use crate::config::{TrackerConfig, TrajectoryRetention};
use crate::error::Error;
use crate::heatmap::{Heatmap, HeatmapView};
use crate::scene::Scene;
use crate::track::{TrackId, TrackSnapshot};
use crate::trajectory::{Trail, TrajectoryBuffer};
use crate::Detection;
use log::{debug, warn};
use serde_derive::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub ticks: u64,
    pub tracks_created: u64,
    pub tracks_retired: u64,
    pub detections_rejected: u64,
}

/// One tracking session: owns every track, trail and the heatmap.
///
/// Calls to [`Pipeline::tick`] must be serialized; the returned snapshots are
/// deep copies and may be read from other threads while the next tick runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: TrackerConfig,
    scene: Scene,
    trajectories: TrajectoryBuffer,
    retired: BTreeMap<TrackId, Trail>,
    heatmap: Heatmap,
    view: Arc<HeatmapView>,
    stats: PipelineStats,
}

impl Pipeline {
    pub fn new(config: TrackerConfig) -> Result<Self, Error> {
        config.validate()?;

        let scene = Scene::new(config.max_disappeared, config.max_distance);
        let trajectories = TrajectoryBuffer::new(config.trajectory_length)?;
        let heatmap = Heatmap::new(config.frame_width, config.frame_height, &config.heatmap)?;
        let view = Arc::new(heatmap.export());

        Ok(Self {
            config,
            scene,
            trajectories,
            retired: BTreeMap::new(),
            heatmap,
            view,
            stats: PipelineStats::default(),
        })
    }

    /// Advances the session by one frame worth of detections.
    ///
    /// Malformed detections are dropped and counted, the rest are tracked.
    pub fn tick(&mut self, detections: &[Detection]) -> TrackSnapshot {
        self.stats.ticks += 1;
        let frame = self.stats.ticks;

        let (width, height) = (self.config.frame_width, self.config.frame_height);
        let mut valid = Vec::with_capacity(detections.len());
        let mut rejected = 0;

        for (idx, det) in detections.iter().enumerate() {
            match det.bbox.validate(width, height) {
                Ok(()) => valid.push(*det),
                Err(err) => {
                    warn!("frame {}: dropping detection #{}: {}", frame, idx, err);
                    rejected += 1;
                }
            }
        }

        let mapping = self.scene.map_detections(&valid);
        let changes = self.scene.update(mapping);

        for id in &changes.retired {
            if let Some(trail) = self.trajectories.remove(*id) {
                if self.config.trajectory_retention == TrajectoryRetention::Keep {
                    self.retired.insert(*id, trail);
                }
            }
        }

        self.heatmap.decay();

        for track in self.scene.tracks().filter(|t| t.is_active()) {
            self.trajectories.append(track.id, track.centroid);
            self.heatmap.record(&track.centroid);
        }

        if (frame - 1) % u64::from(self.config.heatmap.export_interval) == 0 {
            self.view = Arc::new(self.heatmap.export());
        }

        self.stats.tracks_created = self.scene.tracks_created();
        self.stats.tracks_retired += changes.retired.len() as u64;
        self.stats.detections_rejected += rejected as u64;

        self.snapshot(frame, rejected)
    }

    fn snapshot(&self, frame: u64, rejected: usize) -> TrackSnapshot {
        let tracks: Vec<_> = self.scene.tracks().cloned().collect();
        let trajectories = tracks
            .iter()
            .map(|t| (t.id, self.trajectories.snapshot(t.id).unwrap_or_default()))
            .collect();

        TrackSnapshot {
            frame,
            tracks,
            trajectories,
            heatmap: Arc::clone(&self.view),
            rejected,
        }
    }

    /// Returns the session to its freshly constructed state.
    pub fn reset(&mut self) {
        debug!(
            "resetting after {} ticks, {} tracks",
            self.stats.ticks, self.stats.tracks_created
        );

        self.scene.reset();
        self.trajectories.clear();
        self.retired.clear();
        self.heatmap.reset();
        self.view = Arc::new(self.heatmap.export());
        self.stats = PipelineStats::default();
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    #[inline]
    pub fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    /// Fresh export regardless of `export_interval`.
    #[inline]
    pub fn heatmap_view(&self) -> HeatmapView {
        self.heatmap.export()
    }

    #[inline]
    pub fn trajectory(&self, id: TrackId) -> Option<Trail> {
        self.trajectories
            .snapshot(id)
            .or_else(|| self.retired.get(&id).cloned())
    }

    /// Trails of live tracks, plus retired ones when they are kept.
    pub fn all_trajectories(&self) -> BTreeMap<TrackId, Trail> {
        let mut all = self.retired.clone();
        all.extend(self.trajectories.snapshot_all());
        all
    }
}

impl crate::Tracking for Pipeline {
    #[inline]
    fn tick(&mut self, detections: &[Detection]) -> TrackSnapshot {
        Pipeline::tick(self, detections)
    }

    #[inline]
    fn reset(&mut self) {
        Pipeline::reset(self)
    }

    #[inline]
    fn stats(&self) -> PipelineStats {
        Pipeline::stats(self)
    }
}

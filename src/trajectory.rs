use crate::circular_queue::CircularQueue;
use crate::error::Error;
use crate::track::TrackId;
use nalgebra as na;
use std::collections::BTreeMap;

pub type Trail = Vec<na::Point2<f32>>;

/// Bounded centroid history per track id.
#[derive(Debug, Clone)]
pub struct TrajectoryBuffer {
    capacity: usize,
    trails: BTreeMap<TrackId, CircularQueue<na::Point2<f32>>>,
}

impl TrajectoryBuffer {
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::config("trajectory_length", "must be at least 1"));
        }

        Ok(Self {
            capacity,
            trails: BTreeMap::new(),
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `point`, creating the trail on first use and evicting its oldest point when full.
    pub fn append(&mut self, id: TrackId, point: na::Point2<f32>) {
        let capacity = self.capacity;

        self.trails
            .entry(id)
            .or_insert_with(|| CircularQueue::with_capacity(capacity))
            .push(point);
    }

    /// Oldest to newest points of a trail.
    pub fn snapshot(&self, id: TrackId) -> Option<Trail> {
        self.trails.get(&id).map(|q| q.iter().copied().collect())
    }

    #[inline]
    pub fn last(&self, id: TrackId) -> Option<na::Point2<f32>> {
        self.trails.get(&id)?.newest().copied()
    }

    #[inline]
    pub fn contains(&self, id: TrackId) -> bool {
        self.trails.contains_key(&id)
    }

    pub fn remove(&mut self, id: TrackId) -> Option<Trail> {
        self.trails
            .remove(&id)
            .map(|q| q.iter().copied().collect())
    }

    pub fn snapshot_all(&self) -> BTreeMap<TrackId, Trail> {
        self.trails
            .iter()
            .map(|(id, q)| (*id, q.iter().copied().collect()))
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.trails.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    pub fn clear(&mut self) {
        self.trails.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> na::Point2<f32> {
        na::Point2::new(x, y)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            TrajectoryBuffer::new(0),
            Err(Error::InvalidConfig {
                field: "trajectory_length",
                ..
            })
        ));
    }

    #[test]
    fn test_append_creates_trail() {
        let mut buf = TrajectoryBuffer::new(30).unwrap();
        assert_eq!(buf.snapshot(TrackId(7)), None);

        buf.append(TrackId(7), pt(15.0, 15.0));
        buf.append(TrackId(7), pt(17.0, 17.0));

        assert_eq!(
            buf.snapshot(TrackId(7)),
            Some(vec![pt(15.0, 15.0), pt(17.0, 17.0)])
        );
        assert_eq!(buf.last(TrackId(7)), Some(pt(17.0, 17.0)));
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut buf = TrajectoryBuffer::new(4).unwrap();

        for i in 0..10 {
            buf.append(TrackId(1), pt(i as f32, 0.0));
            assert!(buf.snapshot(TrackId(1)).unwrap().len() <= 4);
        }

        let trail = buf.snapshot(TrackId(1)).unwrap();
        let xs: Vec<f32> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut buf = TrajectoryBuffer::new(2).unwrap();
        buf.append(TrackId(1), pt(1.0, 1.0));

        let before = buf.snapshot(TrackId(1)).unwrap();
        buf.append(TrackId(1), pt(2.0, 2.0));

        assert_eq!(before, vec![pt(1.0, 1.0)]);
        assert_eq!(buf.snapshot_all()[&TrackId(1)].len(), 2);

        assert_eq!(buf.remove(TrackId(1)).map(|t| t.len()), Some(2));
        assert!(!buf.contains(TrackId(1)));
        assert!(buf.is_empty());
    }
}

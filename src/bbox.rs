use crate::error::InvalidDetection;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::marker::PhantomData;

pub trait BBoxFormat: std::fmt::Debug {}

/// Left-top-right-bottom format, contains left top and right bottom corners
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Ltrb;
impl BBoxFormat for Ltrb {}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(transparent, bound = "")]
pub struct BBox<F: BBoxFormat>([f32; 4], PhantomData<F>);

impl<F: BBoxFormat> From<BBox<F>> for [f32; 4] {
    fn from(bbox: BBox<F>) -> Self {
        bbox.0
    }
}

impl<F: BBoxFormat> BBox<F> {
    #[inline]
    pub fn as_slice(&self) -> &[f32; 4] {
        &self.0
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl BBox<Ltrb> {
    #[inline]
    pub fn ltrb(x1: f32, x2: f32, x3: f32, x4: f32) -> Self {
        BBox([x1, x2, x3, x4], PhantomData)
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.0[3]
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.right() - self.left()
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.bottom() - self.top()
    }

    /// Geometric center, the point a track follows.
    #[inline]
    pub fn centroid(&self) -> na::Point2<f32> {
        na::Point2::new(
            (self.left() + self.right()) * 0.5,
            (self.top() + self.bottom()) * 0.5,
        )
    }

    /// Checks the box is finite, non-degenerate and lies inside a `width`x`height` frame.
    pub fn validate(&self, width: u32, height: u32) -> Result<(), InvalidDetection> {
        let [xmin, ymin, xmax, ymax] = self.0;

        if !self.is_finite() {
            return Err(InvalidDetection::NonFinite);
        }

        if xmax <= xmin || ymax <= ymin {
            return Err(InvalidDetection::Inverted {
                xmin,
                ymin,
                xmax,
                ymax,
            });
        }

        let (fw, fh) = (width as f32, height as f32);
        if xmin < 0.0 || ymin < 0.0 || xmax > fw || ymax > fh {
            return Err(InvalidDetection::OutOfFrame {
                xmin,
                ymin,
                xmax,
                ymax,
                width,
                height,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid() {
        let b = BBox::ltrb(10.0, 10.0, 20.0, 20.0);
        let c = b.centroid();

        assert!((c.x - 15.0).abs() < f32::EPSILON);
        assert!((c.y - 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_extent() {
        let b = BBox::ltrb(10.0, 20.0, 30.0, 60.0);

        assert!((b.width() - 20.0).abs() < f32::EPSILON);
        assert!((b.height() - 40.0).abs() < f32::EPSILON);
        assert_eq!(<[f32; 4]>::from(b), [10.0, 20.0, 30.0, 60.0]);
    }

    #[test]
    fn test_validate() {
        assert!(BBox::ltrb(0.0, 0.0, 640.0, 480.0).validate(640, 480).is_ok());

        assert!(matches!(
            BBox::ltrb(20.0, 10.0, 10.0, 20.0).validate(640, 480),
            Err(InvalidDetection::Inverted { .. })
        ));
        assert!(matches!(
            BBox::ltrb(10.0, 10.0, 10.0, 20.0).validate(640, 480),
            Err(InvalidDetection::Inverted { .. })
        ));
        assert!(matches!(
            BBox::ltrb(-1.0, 10.0, 10.0, 20.0).validate(640, 480),
            Err(InvalidDetection::OutOfFrame { .. })
        ));
        assert!(matches!(
            BBox::ltrb(600.0, 10.0, 641.0, 20.0).validate(640, 480),
            Err(InvalidDetection::OutOfFrame { .. })
        ));
        assert_eq!(
            BBox::ltrb(f32::NAN, 10.0, 10.0, 20.0).validate(640, 480),
            Err(InvalidDetection::NonFinite)
        );
    }

    #[test]
    fn test_serde_as_plain_array() {
        let b = BBox::ltrb(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");

        let back: BBox<Ltrb> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }
}

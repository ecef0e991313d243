use nalgebra as na;
use num_traits::Float;

#[inline]
pub fn distance(a: &na::Point2<f32>, b: &na::Point2<f32>) -> f32 {
    na::distance(a, b)
}

/// Unnormalized gaussian falloff, `1.0` at `x == 0`.
#[inline]
pub fn gauss<T: Float>(x: T, c: T) -> T {
    let two = T::one() + T::one();

    (-((x * x) / (two * c * c))).exp()
}

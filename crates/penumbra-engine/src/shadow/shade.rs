//! Fragment stage: rounded-rect SDF and Gaussian falloff.

use crate::coords::{ColorRgba, Vec2};

use super::expand::{shape_center, ShadowVarying};
use super::ShadowInstance;

/// Gaussian standard deviation per unit of blur.
pub const SIGMA_PER_BLUR: f32 = 0.5;

/// Lower bound for sigma; keeps `blur = 0` finite (a hard edge).
pub const MIN_SIGMA: f32 = 0.0001;

/// Signed distance from `p` (relative to the rect center) to a rounded rect.
///
/// Negative inside, zero on the boundary, positive outside.
#[inline]
pub fn rounded_rect_sdf(p: Vec2, half_size: Vec2, radius: f32) -> f32 {
    let q = p.abs() - half_size + Vec2::splat(radius);
    q.max_scalar(0.0).length() + q.max_component().min(0.0) - radius
}

/// Unnormalized Gaussian: 1 at `x = 0`.
#[inline]
pub fn gaussian(x: f32, sigma: f32) -> f32 {
    let t = x / sigma;
    (-0.5 * t * t).exp()
}

#[inline]
pub fn blur_sigma(blur: f32) -> f32 {
    (blur * SIGMA_PER_BLUR).max(MIN_SIGMA)
}

/// Runs the fragment stage for one interpolated payload.
///
/// The falloff starts at the shape boundary: interior distances are treated
/// as zero so the body of the shadow stays at full `color.a`.
#[inline]
pub fn shade(v: &ShadowVarying) -> ColorRgba {
    let dist = rounded_rect_sdf(v.uv, v.half_size, v.radius);
    let alpha = gaussian(dist.max(0.0), blur_sigma(v.blur)) * v.color.a;
    v.color.with_alpha(alpha)
}

/// Shades the fragment a draw of `instance` would produce at `pixel`.
///
/// Does not check quad coverage: pixels outside `expanded_rect` are never
/// rasterized on the GPU, but this still returns the (negligible) tail value.
/// The fragment stage never reads `clip_position`, so it is left at the origin.
pub fn sample(instance: &ShadowInstance, pixel: Vec2) -> ColorRgba {
    shade(&ShadowVarying {
        clip_position: [0.0, 0.0, 0.0, 1.0],
        uv: pixel - shape_center(instance),
        color: instance.color(),
        half_size: instance.rect().size / 2.0,
        radius: instance.corner_radius(),
        blur: instance.blur(),
    })
}

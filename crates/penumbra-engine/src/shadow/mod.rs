//! Soft drop-shadow core.
//!
//! A shadow is one instanced quad. The vertex stage (`expand`) grows the
//! shadow rect by a blur margin and projects it to clip space; the fragment
//! stage (`shade`) evaluates a rounded-rectangle SDF per pixel and turns the
//! distance into alpha with a Gaussian falloff.
//!
//! The GPU runs the WGSL version of this math (`render/shapes/shaders/shadow.wgsl`).
//! The functions here are the same math on the CPU: they define the contract
//! the shader is held to and let callers reason about coverage without a device.
//!
//! Preconditions (not validated here):
//! - `rect` width/height are non-negative
//! - `0 <= corner_radius <= min(w, h) / 2`
//! - `blur >= 0`
//!
//! Violations produce degraded but finite output. Sanitizing belongs to the
//! producer of the instances (see `scene::shapes::shadow`).

mod expand;
mod instance;
mod shade;

pub use expand::{
    expand_vertex, expanded_rect, pixel_to_clip, shape_center, ShadowVarying, EXPAND_PER_BLUR,
    QUAD_CORNERS, VERTICES_PER_INSTANCE,
};
pub use instance::{ScreenUniform, ShadowInstance};
pub use shade::{
    blur_sigma, gaussian, rounded_rect_sdf, sample, shade, MIN_SIGMA, SIGMA_PER_BLUR,
};

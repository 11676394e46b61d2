//! Penumbra engine crate.
//!
//! Soft drop shadows for rounded rectangles, rendered as instanced quads
//! with an SDF + Gaussian falloff fragment shader, plus the platform and
//! GPU runtime pieces needed to put them on screen.

pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod scene;
pub mod shadow;
pub mod window;

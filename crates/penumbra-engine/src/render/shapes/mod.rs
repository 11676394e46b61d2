//! Shape renderers.

pub mod shadow;

pub use shadow::ShadowRenderer;

//! GPU rendering subsystem.
//!
//! Renderers consume `scene` draw streams (or pre-built instance slices) and
//! issue GPU commands via wgpu. Each renderer owns its GPU resources.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to clip space using a viewport uniform.

mod ctx;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};

//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic shadow commands
//! - provide deterministic ordering (z-index + insertion order)
//! - sanitize commands into GPU instances (the shadow core never validates)

mod cmd;
mod key;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use key::{SortKey, ZIndex};
pub use list::{DrawItem, DrawList};
pub use shapes::shadow::ShadowCmd;

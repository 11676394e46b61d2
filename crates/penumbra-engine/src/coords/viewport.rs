/// Viewport size in logical pixels.
///
/// This is the `Screen` record the shadow pipeline projects against: it is
/// written once per frame and read by every vertex invocation.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamps each axis to at least one pixel so the clip mapping never divides by zero.
    ///
    /// Minimized windows report a 0x0 logical size.
    #[inline]
    pub fn at_least_one_px(self) -> Self {
        Self::new(self.width.max(1.0), self.height.max(1.0))
    }
}

use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    /// Moves the rectangle by `delta` without changing its size.
    #[inline]
    pub fn translated(self, delta: Vec2) -> Self {
        Rect::from_origin_size(self.origin + delta, self.size)
    }

    /// Grows the rectangle by `margin` on every side.
    ///
    /// Negative margins shrink it; the result is not normalized.
    #[inline]
    pub fn inflated(self, margin: f32) -> Self {
        Rect::from_origin_size(
            self.origin - Vec2::splat(margin),
            self.size + Vec2::splat(margin * 2.0),
        )
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.origin.x, self.origin.y, self.size.x, self.size.y]
    }
}

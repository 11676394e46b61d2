use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Rect, Vec2, Viewport};

/// One shadow to draw.
///
/// The layout is part of the public contract with instance producers and must
/// stay bit-exact (48 bytes):
///
///  offset  0  rect    [f32; 4]   loc 0  (x, y, w, h)
///  offset 16  color   [f32; 4]   loc 1  (r, g, b, a), straight alpha
///  offset 32  params  [f32; 4]   loc 2  (corner_radius, blur, offset_x, offset_y)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShadowInstance {
    pub rect: [f32; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl ShadowInstance {
    #[inline]
    pub fn new(rect: Rect, color: ColorRgba, corner_radius: f32, blur: f32, offset: Vec2) -> Self {
        Self {
            rect: rect.to_array(),
            color: color.to_array(),
            params: [corner_radius, blur, offset.x, offset.y],
        }
    }

    /// Source rect, before the shadow offset is applied.
    #[inline]
    pub fn rect(&self) -> Rect {
        let [x, y, w, h] = self.rect;
        Rect::new(x, y, w, h)
    }

    #[inline]
    pub fn color(&self) -> ColorRgba {
        ColorRgba::from_array(self.color)
    }

    #[inline]
    pub fn corner_radius(&self) -> f32 {
        self.params[0]
    }

    #[inline]
    pub fn blur(&self) -> f32 {
        self.params[1]
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.params[2], self.params[3])
    }
}

/// Per-frame screen uniform (16 bytes; `_pad` keeps UBO alignment).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ScreenUniform {
    pub size: [f32; 2],
    pub _pad: [f32; 2],
}

impl ScreenUniform {
    #[inline]
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self { size: [viewport.width, viewport.height], _pad: [0.0; 2] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_is_48_bytes() {
        assert_eq!(std::mem::size_of::<ShadowInstance>(), 48);
        assert_eq!(std::mem::align_of::<ShadowInstance>(), 4);
    }

    #[test]
    fn screen_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<ScreenUniform>(), 16);
    }

    #[test]
    fn field_order_is_rect_color_params() {
        let inst = ShadowInstance::new(
            Rect::new(1.0, 2.0, 3.0, 4.0),
            ColorRgba::new(0.1, 0.2, 0.3, 0.4),
            5.0,
            6.0,
            Vec2::new(7.0, 8.0),
        );
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&inst));
        assert_eq!(
            floats,
            &[1.0, 2.0, 3.0, 4.0, 0.1, 0.2, 0.3, 0.4, 5.0, 6.0, 7.0, 8.0]
        );
    }

    #[test]
    fn accessors_read_params() {
        let inst = ShadowInstance {
            rect: [0.0, 0.0, 10.0, 10.0],
            color: [0.0, 0.0, 0.0, 1.0],
            params: [2.0, 3.0, -1.0, 4.0],
        };
        assert_eq!(inst.corner_radius(), 2.0);
        assert_eq!(inst.blur(), 3.0);
        assert_eq!(inst.offset(), Vec2::new(-1.0, 4.0));
        assert_eq!(inst.rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn screen_uniform_copies_viewport() {
        let u = ScreenUniform::from_viewport(Viewport::new(800.0, 600.0));
        assert_eq!(u.size, [800.0, 600.0]);
        assert_eq!(u._pad, [0.0, 0.0]);
    }
}

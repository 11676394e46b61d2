use crate::coords::{ColorRgba, Rect, Vec2};
use crate::scene::{DrawCmd, DrawList, ZIndex};
use crate::shadow::ShadowInstance;

/// Drop shadow draw payload.
///
/// Unlike `ShadowInstance` this is not trusted: [`ShadowCmd::to_instance`]
/// sanitizes it before it reaches the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowCmd {
    /// Rect of the element casting the shadow.
    pub rect: Rect,
    /// Straight-alpha shadow color.
    pub color: ColorRgba,
    pub corner_radius: f32,
    /// 0 draws a hard-edged rounded rect.
    pub blur: f32,
    /// Displacement of the shadow relative to `rect`.
    pub offset: Vec2,
}

impl ShadowCmd {
    #[inline]
    pub fn new(rect: Rect, color: ColorRgba, corner_radius: f32, blur: f32) -> Self {
        Self { rect, color, corner_radius, blur, offset: Vec2::zero() }
    }

    #[inline]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Multiplies the shadow alpha by an element opacity in `[0, 1]`.
    #[inline]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.color.a *= opacity.clamp(0.0, 1.0);
        self
    }

    /// Converts to a GPU instance, or `None` if nothing would be visible or
    /// the values are unusable.
    ///
    /// - negative extents are normalized
    /// - empty or non-finite geometry and `alpha <= 0` are dropped
    /// - `corner_radius` is clamped to `[0, min(w, h) / 2]`
    /// - `blur` is clamped to `>= 0`
    pub fn to_instance(&self) -> Option<ShadowInstance> {
        let rect = self.rect.normalized();
        if rect.is_empty() || !rect.is_finite() || !self.offset.is_finite() {
            return None;
        }
        if !self.color.is_finite() || self.color.a <= 0.0 {
            return None;
        }
        if !self.corner_radius.is_finite() || !self.blur.is_finite() {
            return None;
        }

        let max_radius = rect.size.x.min(rect.size.y) * 0.5;
        let radius = self.corner_radius.clamp(0.0, max_radius);
        let blur = self.blur.max(0.0);

        Some(ShadowInstance::new(rect, self.color, radius, blur, self.offset))
    }
}

impl DrawList {
    /// Records a drop shadow.
    #[inline]
    pub fn push_shadow(&mut self, z: ZIndex, cmd: ShadowCmd) {
        self.push(z, DrawCmd::Shadow(cmd));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd() -> ShadowCmd {
        ShadowCmd::new(
            Rect::new(10.0, 20.0, 100.0, 40.0),
            ColorRgba::new(0.0, 0.0, 0.0, 0.5),
            8.0,
            6.0,
        )
    }

    #[test]
    fn valid_command_passes_through() {
        let inst = cmd().with_offset(Vec2::new(0.0, 4.0)).to_instance().unwrap();
        assert_eq!(inst.rect, [10.0, 20.0, 100.0, 40.0]);
        assert_eq!(inst.color, [0.0, 0.0, 0.0, 0.5]);
        assert_eq!(inst.params, [8.0, 6.0, 0.0, 4.0]);
    }

    #[test]
    fn radius_is_clamped_to_half_the_short_side() {
        let mut c = cmd();
        c.corner_radius = 500.0;
        assert_eq!(c.to_instance().unwrap().corner_radius(), 20.0);

        c.corner_radius = -3.0;
        assert_eq!(c.to_instance().unwrap().corner_radius(), 0.0);
    }

    #[test]
    fn negative_blur_becomes_hard_edge() {
        let mut c = cmd();
        c.blur = -1.0;
        assert_eq!(c.to_instance().unwrap().blur(), 0.0);
    }

    #[test]
    fn negative_extents_are_normalized() {
        let mut c = cmd();
        c.rect = Rect::new(110.0, 60.0, -100.0, -40.0);
        assert_eq!(c.to_instance().unwrap().rect, [10.0, 20.0, 100.0, 40.0]);
    }

    #[test]
    fn invisible_or_broken_commands_are_dropped() {
        let mut c = cmd();
        c.color.a = 0.0;
        assert!(c.to_instance().is_none());

        let mut c = cmd();
        c.rect.size.x = 0.0;
        assert!(c.to_instance().is_none());

        let mut c = cmd();
        c.blur = f32::NAN;
        assert!(c.to_instance().is_none());

        let mut c = cmd();
        c.offset = Vec2::new(f32::INFINITY, 0.0);
        assert!(c.to_instance().is_none());
    }

    #[test]
    fn opacity_scales_alpha_only() {
        let c = cmd().with_opacity(0.5);
        assert_eq!(c.color, ColorRgba::new(0.0, 0.0, 0.0, 0.25));
        assert!(cmd().with_opacity(0.0).to_instance().is_none());
    }

    #[test]
    fn push_shadow_records_a_shadow_command() {
        let mut list = DrawList::new();
        list.push_shadow(ZIndex(2), cmd());
        assert_eq!(list.items()[0].cmd, DrawCmd::Shadow(cmd()));
    }
}

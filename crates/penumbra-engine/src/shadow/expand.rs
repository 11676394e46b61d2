//! Vertex stage: quad expansion and projection.

use crate::coords::{ColorRgba, Rect, Vec2, Viewport};

use super::ShadowInstance;

/// Vertices emitted per shadow instance (two triangles, no index buffer).
pub const VERTICES_PER_INSTANCE: u32 = 6;

/// Unit-square corners indexed by vertex index.
///
/// Triangles `{(0,0),(1,0),(0,1)}` and `{(1,0),(1,1),(0,1)}`. The shader
/// carries the same table; the two must not diverge.
pub const QUAD_CORNERS: [Vec2; 6] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// Draw-area margin per unit of blur, added on every side of the quad.
///
/// Tuned by eye together with `SIGMA_PER_BLUR`; keep both as they are.
pub const EXPAND_PER_BLUR: f32 = 2.0;

/// Vertex-to-fragment payload.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowVarying {
    /// Clip-space position `(x, y, 0, 1)`.
    pub clip_position: [f32; 4],
    /// Pixel offset from the shadow shape center (pixel units, pre-projection).
    pub uv: Vec2,
    pub color: ColorRgba,
    /// Half extents of the unexpanded shape.
    pub half_size: Vec2,
    pub radius: f32,
    pub blur: f32,
}

/// Area covered by the quad: the offset shadow rect grown by `blur * 2` per side.
#[inline]
pub fn expanded_rect(instance: &ShadowInstance) -> Rect {
    instance
        .rect()
        .translated(instance.offset())
        .inflated(instance.blur() * EXPAND_PER_BLUR)
}

/// Center of the offset (unexpanded) shadow shape.
#[inline]
pub fn shape_center(instance: &ShadowInstance) -> Vec2 {
    instance.rect().translated(instance.offset()).center()
}

/// Maps a top-left-origin pixel position to clip space (+Y up).
#[inline]
pub fn pixel_to_clip(pixel: Vec2, screen: Viewport) -> Vec2 {
    Vec2::new(
        2.0 * pixel.x / screen.width - 1.0,
        1.0 - 2.0 * pixel.y / screen.height,
    )
}

/// Runs the vertex stage for one corner of one instance.
///
/// `vertex_index` must be in `[0, 6)`. Debug builds assert; release builds
/// wrap so the function stays total.
pub fn expand_vertex(
    instance: &ShadowInstance,
    screen: Viewport,
    vertex_index: u32,
) -> ShadowVarying {
    debug_assert!(
        vertex_index < VERTICES_PER_INSTANCE,
        "shadow vertex index {vertex_index} out of range"
    );
    let corner = QUAD_CORNERS[(vertex_index % VERTICES_PER_INSTANCE) as usize];

    let area = expanded_rect(instance);
    let pixel = area.origin + corner * area.size;
    let clip = pixel_to_clip(pixel, screen);

    ShadowVarying {
        clip_position: [clip.x, clip.y, 0.0, 1.0],
        uv: pixel - shape_center(instance),
        color: instance.color(),
        half_size: instance.rect().size / 2.0,
        radius: instance.corner_radius(),
        blur: instance.blur(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(rect: Rect, radius: f32, blur: f32, offset: Vec2) -> ShadowInstance {
        ShadowInstance::new(rect, ColorRgba::black(), radius, blur, offset)
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn top_left_maps_to_clip_top_left() {
        let c = pixel_to_clip(Vec2::new(0.0, 0.0), Viewport::new(800.0, 600.0));
        assert_eq!(c, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn bottom_right_maps_to_clip_bottom_right() {
        let c = pixel_to_clip(Vec2::new(800.0, 600.0), Viewport::new(800.0, 600.0));
        assert_eq!(c, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn screen_center_maps_to_origin() {
        let c = pixel_to_clip(Vec2::new(400.0, 300.0), Viewport::new(800.0, 600.0));
        assert_eq!(c, Vec2::new(0.0, 0.0));
    }

    // ── expansion ─────────────────────────────────────────────────────────

    #[test]
    fn expansion_adds_two_blur_per_side() {
        let inst = instance(Rect::new(10.0, 10.0, 100.0, 50.0), 0.0, 4.0, Vec2::zero());
        assert_eq!(expanded_rect(&inst), Rect::new(2.0, 2.0, 116.0, 66.0));
    }

    #[test]
    fn zero_blur_does_not_expand() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(expanded_rect(&instance(rect, 0.0, 0.0, Vec2::zero())), rect);
    }

    #[test]
    fn offset_moves_area_and_center_but_not_half_size() {
        let inst = instance(Rect::new(0.0, 0.0, 100.0, 50.0), 5.0, 0.0, Vec2::new(3.0, 7.0));
        assert_eq!(expanded_rect(&inst), Rect::new(3.0, 7.0, 100.0, 50.0));
        assert_eq!(shape_center(&inst), Vec2::new(53.0, 32.0));

        let v = expand_vertex(&inst, Viewport::new(200.0, 100.0), 0);
        assert_eq!(v.half_size, Vec2::new(50.0, 25.0));
    }

    // ── per-vertex output ─────────────────────────────────────────────────

    #[test]
    fn first_and_fifth_vertex_span_the_expanded_rect() {
        let inst = instance(Rect::new(10.0, 10.0, 100.0, 50.0), 0.0, 4.0, Vec2::zero());
        let screen = Viewport::new(800.0, 600.0);

        let tl = expand_vertex(&inst, screen, 0);
        let br = expand_vertex(&inst, screen, 4);

        // uv is measured from the unexpanded center (60, 35).
        assert_eq!(tl.uv, Vec2::new(2.0 - 60.0, 2.0 - 35.0));
        assert_eq!(br.uv, Vec2::new(118.0 - 60.0, 68.0 - 35.0));

        let tl_clip = pixel_to_clip(Vec2::new(2.0, 2.0), screen);
        assert_eq!(tl.clip_position, [tl_clip.x, tl_clip.y, 0.0, 1.0]);
    }

    #[test]
    fn uv_at_corners_equals_half_size_when_unblurred() {
        let inst = instance(Rect::new(0.0, 0.0, 40.0, 20.0), 0.0, 0.0, Vec2::zero());
        let v = expand_vertex(&inst, Viewport::new(100.0, 100.0), 0);
        assert_eq!(v.uv, Vec2::new(-20.0, -10.0));
        let v = expand_vertex(&inst, Viewport::new(100.0, 100.0), 4);
        assert_eq!(v.uv, Vec2::new(20.0, 10.0));
    }

    #[test]
    fn forwards_shape_parameters() {
        let inst = ShadowInstance::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            ColorRgba::new(0.2, 0.4, 0.6, 0.8),
            3.0,
            1.5,
            Vec2::zero(),
        );
        for i in 0..VERTICES_PER_INSTANCE {
            let v = expand_vertex(&inst, Viewport::new(10.0, 10.0), i);
            assert_eq!(v.color, ColorRgba::new(0.2, 0.4, 0.6, 0.8));
            assert_eq!(v.radius, 3.0);
            assert_eq!(v.blur, 1.5);
        }
    }

    #[test]
    fn corner_table_is_two_triangles_covering_the_unit_square() {
        let (a, b) = QUAD_CORNERS.split_at(3);
        let area = |t: &[Vec2]| {
            ((t[1].x - t[0].x) * (t[2].y - t[0].y) - (t[2].x - t[0].x) * (t[1].y - t[0].y)).abs()
                / 2.0
        };
        assert_eq!(area(a) + area(b), 1.0);
        // Both triangles share the (1,0)-(0,1) diagonal.
        assert!(a.contains(&Vec2::new(1.0, 0.0)) && a.contains(&Vec2::new(0.0, 1.0)));
        assert!(b.contains(&Vec2::new(1.0, 0.0)) && b.contains(&Vec2::new(0.0, 1.0)));
    }
}

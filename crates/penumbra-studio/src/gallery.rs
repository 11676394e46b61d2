//! Card gallery recorded into the draw list every frame.
//!
//! Each cell is a white card lifted by a soft shadow. Shadows sit on
//! `SHADOW_Z`, cards on `CARD_Z`, so every shadow paints before every card.

use penumbra_engine::coords::{ColorRgba, Rect, Vec2, Viewport};
use penumbra_engine::scene::{DrawList, ShadowCmd, ZIndex};

pub const SHADOW_Z: ZIndex = ZIndex(0);
pub const CARD_Z: ZIndex = ZIndex(1);

const COLUMNS: usize = 4;
const ROWS: usize = 2;
const MARGIN: f32 = 48.0;
const GAP: f32 = 56.0;

/// (corner_radius, blur) per cell, row-major.
const PRESETS: [(f32, f32); COLUMNS * ROWS] = [
    (0.0, 2.0),
    (8.0, 6.0),
    (16.0, 12.0),
    (24.0, 20.0),
    (4.0, 0.0),
    (12.0, 8.0),
    (20.0, 16.0),
    (999.0, 28.0), // pill; sanitized to half the short side
];

const SHADOW_COLOR: ColorRgba = ColorRgba::new(0.05, 0.07, 0.12, 0.45);

/// Blur multiplier in `[0.5, 1.0]`, breathing with a ~4 s period.
pub fn breathe(seconds: f32) -> f32 {
    0.75 + 0.25 * (seconds * std::f32::consts::TAU / 4.0).sin()
}

/// Records the gallery for a viewport.
///
/// Returns the number of cards; nothing is recorded when the viewport is too
/// small to fit them.
pub fn record(list: &mut DrawList, viewport: Viewport, blur_scale: f32) -> usize {
    let cell_w = (viewport.width - 2.0 * MARGIN - GAP * (COLUMNS - 1) as f32) / COLUMNS as f32;
    let cell_h = (viewport.height - 2.0 * MARGIN - GAP * (ROWS - 1) as f32) / ROWS as f32;
    if cell_w <= 0.0 || cell_h <= 0.0 {
        return 0;
    }

    for (i, &(radius, blur)) in PRESETS.iter().enumerate() {
        let col = (i % COLUMNS) as f32;
        let row = (i / COLUMNS) as f32;
        let card = Rect::new(
            MARGIN + col * (cell_w + GAP),
            MARGIN + row * (cell_h + GAP),
            cell_w,
            cell_h,
        );

        let blur = blur * blur_scale;
        list.push_shadow(
            SHADOW_Z,
            ShadowCmd::new(card, SHADOW_COLOR, radius, blur).with_offset(Vec2::new(0.0, blur * 0.5)),
        );
        list.push_shadow(CARD_Z, ShadowCmd::new(card, ColorRgba::white(), radius, 0.0));
    }

    PRESETS.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use penumbra_engine::scene::DrawCmd;

    #[test]
    fn records_a_shadow_and_a_card_per_cell() {
        let mut list = DrawList::new();
        let n = record(&mut list, Viewport::new(1280.0, 720.0), 1.0);
        assert_eq!(n, PRESETS.len());
        assert_eq!(list.len(), 2 * PRESETS.len());
    }

    #[test]
    fn shadows_paint_before_cards() {
        let mut list = DrawList::new();
        record(&mut list, Viewport::new(1280.0, 720.0), 1.0);

        let zs: Vec<ZIndex> = list.iter_in_paint_order().map(|item| item.key.z).collect();
        let first_card = zs.iter().position(|&z| z == CARD_Z).unwrap();
        assert!(zs[..first_card].iter().all(|&z| z == SHADOW_Z));
        assert!(zs[first_card..].iter().all(|&z| z == CARD_Z));
    }

    #[test]
    fn cards_are_hard_edged_and_inside_the_viewport() {
        let viewport = Viewport::new(1280.0, 720.0);
        let mut list = DrawList::new();
        record(&mut list, viewport, 1.0);

        for item in list.items().iter().filter(|i| i.key.z == CARD_Z) {
            let DrawCmd::Shadow(cmd) = &item.cmd;
            let inst = cmd.to_instance().unwrap();
            assert_eq!(inst.blur(), 0.0);
            let r = inst.rect();
            assert!(r.origin.x >= 0.0 && r.origin.x + r.size.x <= viewport.width);
            assert!(r.origin.y >= 0.0 && r.origin.y + r.size.y <= viewport.height);
        }
    }

    #[test]
    fn tiny_viewport_records_nothing() {
        let mut list = DrawList::new();
        assert_eq!(record(&mut list, Viewport::new(100.0, 100.0), 1.0), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn breathe_stays_in_range() {
        for i in 0..100 {
            let b = breathe(i as f32 * 0.1);
            assert!((0.5..=1.0).contains(&b));
        }
    }
}

use std::time::Instant;

use anyhow::Result;
use penumbra_engine::coords::ColorRgba;
use penumbra_engine::core::{App, AppControl, FrameCtx};
use penumbra_engine::device::GpuInit;
use penumbra_engine::logging::{init_logging, LoggingConfig};
use penumbra_engine::render::shapes::ShadowRenderer;
use penumbra_engine::scene::DrawList;
use penumbra_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

mod clock;
mod gallery;

use clock::AnimationClock;

const BACKGROUND: ColorRgba = ColorRgba::new(0.90, 0.91, 0.93, 1.0);

/// Esc quits, Space pauses the blur animation.
struct Studio {
    draw_list: DrawList,
    shadows: ShadowRenderer,
    clock: AnimationClock,
}

impl Studio {
    fn new() -> Self {
        Self {
            draw_list: DrawList::new(),
            shadows: ShadowRenderer::new(),
            clock: AnimationClock::new(Instant::now()),
        }
    }
}

impl App for Studio {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }

        match &event.logical_key {
            Key::Named(NamedKey::Escape) => AppControl::Exit,
            Key::Named(NamedKey::Space) => {
                let paused = self.clock.toggle(Instant::now());
                log::info!("animation {}", if paused { "paused" } else { "resumed" });
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.frame_index == 0 {
            let info = ctx.gpu.adapter_info();
            log::info!("rendering on {} ({:?})", info.name, info.backend);
        }

        let blur_scale = gallery::breathe(self.clock.seconds(Instant::now()));

        self.draw_list.clear();
        gallery::record(&mut self.draw_list, ctx.window.viewport(), blur_scale);

        let (draw_list, shadows) = (&mut self.draw_list, &mut self.shadows);
        ctx.render(BACKGROUND, |rctx, target| shadows.render(rctx, target, draw_list))
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Penumbra Studio".to_string(),
        initial_size: LogicalSize::new(1280.0, 720.0),
    };

    Runtime::run(config, GpuInit::default(), Studio::new())
}

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};
use crate::shadow::{ScreenUniform, ShadowInstance, VERTICES_PER_INSTANCE};

/// Renderer for `DrawCmd::Shadow`.
///
/// One instanced draw per call: 6 vertices per shadow, generated in the
/// vertex shader from `vertex_index`, so there is no index or per-vertex
/// buffer. Instances are drawn in the order given; the caller owns ordering.
///
/// Blending is straight alpha: the fragment stage emits `(r, g, b, alpha)`
/// with unscaled RGB.
pub struct ShadowRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    screen_ubo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    /// Scratch buffer reused by `render` across frames.
    instances: Vec<ShadowInstance>,
    warned_rejected: bool,
}

impl Default for ShadowRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            screen_ubo: None,
            instance_vbo: None,
            instance_capacity: 0,
            instances: Vec::new(),
            warned_rejected: false,
        }
    }
}

impl ShadowRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the shadows recorded in `draw_list`, in paint order.
    ///
    /// Commands that sanitize to nothing (transparent, empty, non-finite) are
    /// skipped; the first one logs at debug level.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let mut instances = std::mem::take(&mut self.instances);
        instances.clear();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Shadow(cmd) = &item.cmd;
            match cmd.to_instance() {
                Some(inst) => instances.push(inst),
                None => {
                    if !self.warned_rejected {
                        log::debug!("ShadowRenderer: skipping invisible or invalid shadow {cmd:?}");
                        self.warned_rejected = true;
                    }
                }
            }
        }

        self.render_instances(ctx, target, &instances);
        self.instances = instances;
    }

    /// Draws a ready-made instance slice as-is.
    ///
    /// Instances are trusted: no clamping or validation happens here.
    pub fn render_instances(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        instances: &[ShadowInstance],
    ) {
        if instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);

        // Mutating methods must happen before borrowing pipeline/buffers immutably.
        self.write_screen_uniform(ctx);
        self.ensure_instance_capacity(ctx, instances.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(instances));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("penumbra shadow pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let used = (instances.len() * std::mem::size_of::<ShadowInstance>()) as u64;

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, instance_vbo.slice(..used));
        rpass.draw(0..VERTICES_PER_INSTANCE, 0..instances.len() as u32);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        log::debug!("ShadowRenderer: building pipeline for {:?}", ctx.surface_format);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("penumbra shadow shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("penumbra shadow bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ScreenUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("penumbra shadow pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("penumbra shadow pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[ShadowInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.screen_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.screen_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let screen_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("penumbra shadow screen ubo"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("penumbra shadow bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_ubo.as_entire_binding(),
            }],
        });

        self.screen_ubo = Some(screen_ubo);
        self.bind_group = Some(bind_group);
    }

    /// Uploads the screen size. Written through the queue, so it is ordered
    /// before this frame's draws and after the previous frame's.
    fn write_screen_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.screen_ubo.as_ref() else { return };
        let uniform = ScreenUniform::from_viewport(ctx.viewport.at_least_one_px());
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = instance_capacity_for(required);
        log::debug!("ShadowRenderer: growing instance buffer to {new_cap} shadows");

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("penumbra shadow instance vbo"),
            size: (new_cap * std::mem::size_of::<ShadowInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

const SHADER_SOURCE: &str = include_str!("shaders/shadow.wgsl");

const MIN_INSTANCE_CAPACITY: usize = 64;

fn instance_capacity_for(required: usize) -> usize {
    required.next_power_of_two().max(MIN_INSTANCE_CAPACITY)
}

// ── GPU layout ────────────────────────────────────────────────────────────

impl ShadowInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x4, // rect
        1 => Float32x4, // color
        2 => Float32x4  // params
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShadowInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::shadow::{EXPAND_PER_BLUR, MIN_SIGMA, QUAD_CORNERS, SIGMA_PER_BLUR};

    fn parse_shader() -> naga::Module {
        naga::front::wgsl::parse_str(SHADER_SOURCE)
            .unwrap_or_else(|e| panic!("{}", e.emit_to_string(SHADER_SOURCE)))
    }

    fn shader_f32_const(module: &naga::Module, name: &str) -> f32 {
        let (_, constant) = module
            .constants
            .iter()
            .find(|(_, c)| c.name.as_deref() == Some(name))
            .unwrap_or_else(|| panic!("shader has no const `{name}`"));
        match module.global_expressions[constant.init] {
            naga::Expression::Literal(naga::Literal::F32(v)) => v,
            ref other => panic!("const `{name}` is not an f32 literal: {other:?}"),
        }
    }

    /// Reads the `array<vec2<f32>, 6>(...)` corner table out of the shader text.
    fn shader_corner_table() -> Vec<Vec2> {
        let start = SHADER_SOURCE
            .find("array<vec2<f32>, 6>(")
            .expect("shader has no corner table");
        let body = &SHADER_SOURCE[start..];
        let body = &body[..body.find(");").expect("unterminated corner table")];

        body.split("vec2<f32>(")
            .skip(1)
            .map(|entry| {
                let args = &entry[..entry.find(')').expect("unterminated corner")];
                let xy: Vec<f32> =
                    args.split(',').map(|n| n.trim().parse().expect("corner component")).collect();
                Vec2::new(xy[0], xy[1])
            })
            .collect()
    }

    #[test]
    fn capacity_rounds_up_to_power_of_two_with_floor() {
        assert_eq!(instance_capacity_for(1), 64);
        assert_eq!(instance_capacity_for(64), 64);
        assert_eq!(instance_capacity_for(65), 128);
        assert_eq!(instance_capacity_for(1000), 1024);
    }

    #[test]
    fn instance_attributes_match_record_offsets() {
        let layout = ShadowInstance::layout();
        assert_eq!(layout.array_stride, 48);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);

        let offsets: Vec<(u32, u64)> =
            layout.attributes.iter().map(|a| (a.shader_location, a.offset)).collect();
        assert_eq!(offsets, vec![(0, 0), (1, 16), (2, 32)]);
    }

    #[test]
    fn shader_declares_entry_points_and_instance_locations() {
        for needle in [
            "fn vs_main",
            "fn fs_main",
            "@location(0) rect: vec4<f32>",
            "@location(1) color: vec4<f32>",
            "@location(2) params: vec4<f32>",
            "var<uniform> screen: Screen",
        ] {
            assert!(SHADER_SOURCE.contains(needle), "shader is missing `{needle}`");
        }
    }

    #[test]
    fn shader_parses_and_validates() {
        let module = parse_shader();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("shadow.wgsl failed validation: {e:?}"));
    }

    #[test]
    fn shader_constants_match_cpu_math() {
        let module = parse_shader();
        assert_eq!(shader_f32_const(&module, "EXPAND_PER_BLUR"), EXPAND_PER_BLUR);
        assert_eq!(shader_f32_const(&module, "SIGMA_PER_BLUR"), SIGMA_PER_BLUR);
        assert_eq!(shader_f32_const(&module, "MIN_SIGMA"), MIN_SIGMA);
    }

    #[test]
    fn shader_corner_table_matches_cpu_table() {
        assert_eq!(shader_corner_table(), QUAD_CORNERS.to_vec());
    }
}

//! Compute-shader rasterization of the scene into a [`StorageTarget`].

use bytemuck::{Pod, Zeroable};

use algol_engine::render::{RenderCtx, ShaderTemplate, StorageTarget};

/// Compute workgroup edge, matching `@workgroup_size(16, 16)` in the shader.
pub const WORKGROUP_SIZE: u32 = 16;

/// Largest object count a single dispatch accepts. Two arrays of this many
/// `vec4<f32>` fill the default 64 KiB uniform binding.
pub const MAX_OBJECTS: usize = 2048;

/// Shader placeholder substituted with the compiled array capacity.
pub const OBJECT_COUNT_TOKEN: &str = "NUMBER_OF_OBJECTS";

/// Per-frame scene parameters (128 bytes).
///
///  offset   0  view          mat4x4<f32>  rows: right, up, forward
///  offset  64  background    vec4<f32>
///  offset  80  camera        vec4<f32>    xyz focus, w focal length
///  offset  96  resolution    vec2<f32>
///  offset 104  zoom          f32
///  offset 108  checkerboard  u32
///  offset 112  object_count  u32
///  offset 116  _pad          3 × u32
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SceneUniform {
    pub view: [[f32; 4]; 4],
    pub background: [f32; 4],
    pub camera: [f32; 4],
    pub resolution: [f32; 2],
    pub zoom: f32,
    pub checkerboard: u32,
    pub object_count: u32,
    pub _pad: [u32; 3],
}

/// Array capacity the shader is compiled with for `count` objects.
pub fn capacity_for(count: usize) -> usize {
    count.clamp(1, MAX_OBJECTS)
}

/// Workgroup counts covering a `size` texture with 16×16 tiles.
pub fn dispatch_grid(size: (u32, u32)) -> (u32, u32, u32) {
    (size.0.div_ceil(WORKGROUP_SIZE), size.1.div_ceil(WORKGROUP_SIZE), 1)
}

/// Lays out bodies then colors, each zero-padded to `capacity` entries.
///
/// Input beyond `capacity` is dropped.
pub fn pack_objects(bodies: &[[f32; 4]], colors: &[[f32; 4]], capacity: usize) -> Vec<[f32; 4]> {
    let mut out = vec![[0.0f32; 4]; capacity * 2];
    for (slot, body) in out[..capacity].iter_mut().zip(bodies) {
        *slot = *body;
    }
    for (slot, color) in out[capacity..].iter_mut().zip(colors) {
        *slot = *color;
    }
    out
}

/// Owns the compute pipeline and its buffers.
///
/// The pipeline is compiled for a fixed object capacity and rebuilt when the
/// required capacity changes. Bind groups are rebuilt when the output texture
/// is recreated.
pub struct SceneRaster {
    template: ShaderTemplate,

    capacity: usize,
    pipeline: Option<wgpu::ComputePipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    scene_ubo: Option<wgpu::Buffer>,
    objects_ubo: Option<wgpu::Buffer>,
    luminance_buf: Option<wgpu::Buffer>,

    bind_group: Option<wgpu::BindGroup>,
    bound_generation: u64,

    warned_truncation: bool,
}

impl SceneRaster {
    pub fn new(template: ShaderTemplate) -> Self {
        Self {
            template,
            capacity: 0,
            pipeline: None,
            bind_group_layout: None,
            scene_ubo: None,
            objects_ubo: None,
            luminance_buf: None,
            bind_group: None,
            bound_generation: 0,
            warned_truncation: false,
        }
    }

    /// Atomic `u32` sum of per-pixel luminance written by the last dispatch.
    pub fn luminance_buffer(&self) -> Option<&wgpu::Buffer> {
        self.luminance_buf.as_ref()
    }

    /// Records the compute pass that fills `target`.
    ///
    /// `bodies` are `(x, y, z, radius)` and `colors` are `(r, g, b, emission)`,
    /// co-indexed and sorted by radius.
    pub fn dispatch(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        target: &StorageTarget,
        scene: &SceneUniform,
        bodies: &[[f32; 4]],
        colors: &[[f32; 4]],
    ) {
        let Some(target_view) = target.view() else { return };

        let count = bodies.len().min(colors.len());
        if count > MAX_OBJECTS && !self.warned_truncation {
            log::warn!("{count} objects exceed the {MAX_OBJECTS} supported; extras are not drawn");
            self.warned_truncation = true;
        }

        self.ensure_pipeline(ctx, capacity_for(count));
        self.ensure_buffers(ctx);
        self.ensure_bindings(ctx, target_view, target.generation());

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(scene_ubo) = self.scene_ubo.as_ref() else { return };
        let Some(objects_ubo) = self.objects_ubo.as_ref() else { return };
        let Some(luminance_buf) = self.luminance_buf.as_ref() else { return };

        let scene = SceneUniform {
            object_count: count.min(self.capacity) as u32,
            ..*scene
        };
        ctx.queue.write_buffer(scene_ubo, 0, bytemuck::bytes_of(&scene));
        ctx.queue.write_buffer(
            objects_ubo,
            0,
            bytemuck::cast_slice(&pack_objects(bodies, colors, self.capacity)),
        );
        encoder.clear_buffer(luminance_buf, 0, None);

        let (gx, gy, gz) = dispatch_grid(target.size());
        let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("algol scene pass"),
            timestamp_writes: None,
        });
        cpass.set_pipeline(pipeline);
        cpass.set_bind_group(0, bind_group, &[]);
        cpass.dispatch_workgroups(gx, gy, gz);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, capacity: usize) {
        if self.capacity == capacity && self.pipeline.is_some() {
            return;
        }

        log::info!("compiling scene shader for {capacity} objects");
        let shader = self.template.compile(ctx.device, &[(OBJECT_COUNT_TOKEN, capacity)]);

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("algol scene bgl"),
                entries: &[
                    uniform_entry(0),
                    uniform_entry(1),
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::StorageTexture {
                            access: wgpu::StorageTextureAccess::WriteOnly,
                            format: StorageTarget::FORMAT,
                            view_dimension: wgpu::TextureViewDimension::D2,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: false },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("algol scene pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("algol scene pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        self.capacity = capacity;
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.objects_ubo = None;
        self.bind_group = None;
    }

    fn ensure_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.scene_ubo.is_none() {
            self.scene_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("algol scene ubo"),
                size: std::mem::size_of::<SceneUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        if self.objects_ubo.is_none() {
            self.objects_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("algol objects ubo"),
                size: (self.capacity * 2 * std::mem::size_of::<[f32; 4]>()) as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.bind_group = None;
        }
        if self.luminance_buf.is_none() {
            self.luminance_buf = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("algol luminance sum"),
                size: std::mem::size_of::<u32>() as u64,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.bind_group = None;
        }
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>, view: &wgpu::TextureView, generation: u64) {
        if self.bind_group.is_some() && self.bound_generation == generation {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(scene_ubo) = self.scene_ubo.as_ref() else { return };
        let Some(objects_ubo) = self.objects_ubo.as_ref() else { return };
        let Some(luminance_buf) = self.luminance_buf.as_ref() else { return };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("algol scene bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: scene_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: objects_ubo.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry { binding: 3, resource: luminance_buf.as_entire_binding() },
            ],
        });

        self.bind_group = Some(bind_group);
        self.bound_generation = generation;
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_uniform_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 128);
        assert_eq!(std::mem::offset_of!(SceneUniform, background), 64);
        assert_eq!(std::mem::offset_of!(SceneUniform, camera), 80);
        assert_eq!(std::mem::offset_of!(SceneUniform, resolution), 96);
        assert_eq!(std::mem::offset_of!(SceneUniform, zoom), 104);
        assert_eq!(std::mem::offset_of!(SceneUniform, checkerboard), 108);
        assert_eq!(std::mem::offset_of!(SceneUniform, object_count), 112);
    }

    #[test]
    fn capacity_is_at_least_one() {
        assert_eq!(capacity_for(0), 1);
        assert_eq!(capacity_for(1), 1);
        assert_eq!(capacity_for(7), 7);
        assert_eq!(capacity_for(MAX_OBJECTS + 10), MAX_OBJECTS);
    }

    #[test]
    fn grid_covers_texture() {
        assert_eq!(dispatch_grid((1280, 720)), (80, 45, 1));
        assert_eq!(dispatch_grid((1281, 721)), (81, 46, 1));
        assert_eq!(dispatch_grid((1, 1)), (1, 1, 1));
        let (gx, gy, _) = dispatch_grid((1000, 333));
        assert!(gx * WORKGROUP_SIZE >= 1000 && (gx - 1) * WORKGROUP_SIZE < 1000);
        assert!(gy * WORKGROUP_SIZE >= 333 && (gy - 1) * WORKGROUP_SIZE < 333);
    }

    #[test]
    fn packing_pads_to_capacity() {
        let bodies = [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]];
        let colors = [[0.1, 0.2, 0.3, 1.0], [0.4, 0.5, 0.6, 0.0]];
        let packed = pack_objects(&bodies, &colors, 4);
        assert_eq!(packed.len(), 8);
        assert_eq!(&packed[..2], &bodies);
        assert_eq!(packed[2], [0.0; 4]);
        assert_eq!(packed[3], [0.0; 4]);
        assert_eq!(&packed[4..6], &colors);
        assert_eq!(packed[7], [0.0; 4]);
    }

    #[test]
    fn packing_empty_world_keeps_one_slot() {
        let packed = pack_objects(&[], &[], capacity_for(0));
        assert_eq!(packed, vec![[0.0; 4]; 2]);
    }

    #[test]
    fn packing_drops_overflow() {
        let bodies = [[1.0; 4]; 3];
        let packed = pack_objects(&bodies, &bodies, 2);
        assert_eq!(packed.len(), 4);
        assert!(packed.iter().all(|v| *v == [1.0; 4]));
    }

    #[test]
    fn shipped_shader_resolves_every_token() {
        let template = ShaderTemplate::load(crate::config::StudioConfig::default().shader_path).unwrap();
        assert!(template.source().contains("%%NUMBER_OF_OBJECTS%%"));
        let src = template.render(&[(OBJECT_COUNT_TOKEN, 3)]);
        assert!(algol_engine::render::unresolved_tokens(&src).is_empty());
        assert!(src.contains("array<vec4<f32>, 3>"));
        assert!(src.contains("@workgroup_size(16, 16, 1)"));
    }
}

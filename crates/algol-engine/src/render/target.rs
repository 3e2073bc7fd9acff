/// Off-screen RGBA8 texture that a compute pass writes and a render pass samples.
///
/// The texture tracks the drawable size; [`StorageTarget::ensure_size`]
/// recreates it when the size changes and bumps [`StorageTarget::generation`]
/// so dependent bind groups know to rebuild.
pub struct StorageTarget {
    label: &'static str,
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    size: (u32, u32),
    generation: u64,
}

impl StorageTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            texture: None,
            view: None,
            size: (0, 0),
            generation: 0,
        }
    }

    /// Recreates the texture if `size` differs from the current one.
    ///
    /// Zero dimensions are clamped to 1. Returns `true` when a new texture was
    /// created.
    pub fn ensure_size(&mut self, device: &wgpu::Device, size: (u32, u32)) -> bool {
        let size = (size.0.max(1), size.1.max(1));
        if self.texture.is_some() && self.size == size {
            return false;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(self.label),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("{}: resized to {}x{}", self.label, size.0, size.1);

        self.texture = Some(texture);
        self.view = Some(view);
        self.size = size;
        self.generation += 1;
        true
    }

    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Number of textures created so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pixel_count(&self) -> u64 {
        self.size.0 as u64 * self.size.1 as u64
    }
}

//! GPU textures: the depth buffer, material color maps and the white fallback

use super::texture_loader::DecodedImage;

/// A texture with the view and sampler the material bind group needs
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Color maps are sampled as stored. The surface is non-sRGB, so texels
    /// and material colors both stay in display space.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Depth attachment sized to the surface; zero sizes are clamped to 1
    pub fn depth(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = clamped_sampler(device, "Depth Sampler", wgpu::FilterMode::Nearest);

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads a decoded image as a trilinear filtered color map with a full
    /// mip chain
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &DecodedImage,
    ) -> Self {
        Self::from_levels(
            device,
            queue,
            label,
            &image.mip_chain(),
            wgpu::FilterMode::Linear,
        )
    }

    /// 1x1 opaque white, bound while a material's texture is missing or
    /// still loading
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let pixel = DecodedImage {
            pixels: vec![255; 4],
            width: 1,
            height: 1,
        };
        Self::from_levels(
            device,
            queue,
            "Fallback White Texture",
            std::slice::from_ref(&pixel),
            wgpu::FilterMode::Nearest,
        )
    }

    /// `levels[0]` is the base image, each later entry the next mip level
    fn from_levels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        levels: &[DecodedImage],
        filter: wgpu::FilterMode,
    ) -> Self {
        let (width, height) = levels
            .first()
            .map_or((1, 1), |base| (base.width, base.height));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len().max(1) as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level.pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = clamped_sampler(device, &format!("{} Sampler", label), filter);

        Self {
            texture,
            view,
            sampler,
        }
    }
}

fn clamped_sampler(device: &wgpu::Device, label: &str, filter: wgpu::FilterMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: filter,
        ..Default::default()
    })
}

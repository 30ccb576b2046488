//! WGPU-based rendering engine
//!
//! Owns the surface, the device and every pipeline. Draws a [`Scene`] in
//! three passes over the same render target: opaque triangles, lines, then
//! blended triangles back to front. An optional overlay callback records its
//! own pass on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cgmath::Vector3;
use wgpu::{Device, TextureFormat};

use super::{
    draw_order::sort_draws,
    pipeline_manager::{PipelineConfig, PipelineManager},
};
use crate::{
    error::Result,
    gfx::{
        camera::{camera_utils::CameraUniform, OrbitCamera},
        resources::{
            global_bindings::{
                update_global_ubo, GlobalBindings, GlobalUBO, GlobalUBOContent, LightConfig,
            },
            material::create_material_layout,
            texture_loader::DecodedImage,
            texture_resource::TextureResource,
        },
        scene::{DrawObject, Object, Scene},
    },
    render_loop::Rasterizer,
    wgpu_utils::{BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
};

const OPAQUE_PIPELINE: &str = "Opaque";
const TRANSPARENT_PIPELINE: &str = "Transparent";
const LINES_PIPELINE: &str = "Lines";

const TRANSFORM_GROUP: u32 = 1;
const MATERIAL_GROUP: u32 = 2;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    transform_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,
    fallback_texture: TextureResource,
    textures: HashMap<PathBuf, TextureResource>,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::depth(&device, config.width, config.height);

        let global_ubo = GlobalUBO::new(
            &device,
            &GlobalUBOContent::new(CameraUniform::default(), LightConfig::default()),
        );
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let transform_layout = BindGroupLayoutBuilder::new()
            .uniform(wgpu::ShaderStages::VERTEX)
            .create(&device, "Transform Bind Group Layout");
        let material_layout = create_material_layout(&device);

        let fallback_texture = TextureResource::white(&device, &queue);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());
        pipeline_manager.load_shader("basic", include_str!("shader.wgsl"));

        let layouts = vec![
            global_bindings.bind_group_layout().clone(),
            transform_layout.layout.clone(),
            material_layout.layout.clone(),
        ];
        let base = PipelineConfig::default()
            .with_shader("basic")
            .with_depth_stencil(TextureResource::DEPTH_FORMAT)
            .with_bind_group_layouts(layouts);

        pipeline_manager.register_pipeline(
            OPAQUE_PIPELINE,
            base.clone()
                .with_label("OPAQUE")
                .with_color_target(format, Some(wgpu::BlendState::REPLACE)),
        );
        pipeline_manager.register_pipeline(
            TRANSPARENT_PIPELINE,
            base.clone()
                .with_label("TRANSPARENT")
                .with_depth_write(false)
                .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING)),
        );
        pipeline_manager.register_pipeline(
            LINES_PIPELINE,
            base.with_label("LINES")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING)),
        );
        pipeline_manager.create_all_pipelines()?;

        log::info!("Render engine ready: {}x{} {:?}", config.width, config.height, format);

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            transform_layout,
            material_layout,
            fallback_texture,
            textures: HashMap::new(),
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Creates GPU resources for every object and material in `scene`.
    ///
    /// Materials whose texture is already uploaded bind it right away; the
    /// rest use the white fallback until [`RenderEngine::upload_texture`].
    pub fn prepare_scene(&self, scene: &mut Scene) {
        scene.init_gpu_resources(
            &self.device,
            &self.queue,
            &self.transform_layout.layout,
            &self.material_layout,
            &self.fallback_texture,
        );
        for (path, texture) in &self.textures {
            scene.bind_texture(path, &self.device, &self.queue, &self.material_layout, texture);
        }
    }

    /// Uploads a decoded image and binds it to every material using `path`.
    ///
    /// Images larger than the device allows are downscaled first. Empty
    /// images are skipped and their materials stay untextured.
    /// Returns how many materials picked the texture up.
    pub fn upload_texture(&mut self, scene: &mut Scene, path: &Path, image: &DecodedImage) -> usize {
        let max_dimension = self.device.limits().max_texture_dimension_2d;
        let Some(fitted) = image.fit_within(max_dimension) else {
            log::warn!(
                "Texture {} ({}x{}) cannot be uploaded; rendering untextured",
                path.display(),
                image.width,
                image.height
            );
            return 0;
        };
        if fitted.width != image.width || fitted.height != image.height {
            log::warn!(
                "Texture {} is {}x{}, above the {}px limit; downscaled to {}x{}",
                path.display(),
                image.width,
                image.height,
                max_dimension,
                fitted.width,
                fitted.height
            );
        }

        let label = path.display().to_string();
        let texture = TextureResource::from_image(&self.device, &self.queue, &label, &fitted);
        let bound = scene.bind_texture(path, &self.device, &self.queue, &self.material_layout, &texture);
        self.textures.insert(path.to_path_buf(), texture);
        bound
    }

    /// Renders a frame with an optional overlay
    ///
    /// Lost or outdated surfaces are reconfigured and the frame skipped, as
    /// is a timed-out acquire. Any other surface error is returned.
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        camera: CameraUniform,
        eye: Vector3<f32>,
        overlay: Option<F>,
    ) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera, scene.lighting());
        scene.sync_transforms(&self.queue);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("Surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let draws = sort_draws(scene, eye);
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for (name, objects) in [
                (OPAQUE_PIPELINE, &draws.opaque),
                (LINES_PIPELINE, &draws.lines),
                (TRANSPARENT_PIPELINE, &draws.transparent),
            ] {
                if objects.is_empty() {
                    continue;
                }
                let Some(pipeline) = self.pipeline_manager.get_pipeline(name) else {
                    log::error!("Pipeline '{}' missing", name);
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                draw_objects(&mut render_pass, scene, objects);
            }
        }

        if let Some(overlay) = overlay {
            overlay(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimised window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = TextureResource::depth(&self.device, width, height);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

impl Rasterizer for RenderEngine {
    fn render(&mut self, scene: &Scene, camera: &OrbitCamera) -> Result<()> {
        self.render_frame(
            scene,
            camera.uniform,
            camera.eye,
            None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
        )
    }
}

fn draw_objects(render_pass: &mut wgpu::RenderPass<'_>, scene: &Scene, objects: &[&Object]) {
    for object in objects {
        let material = scene.material_for(object);
        let Some(material_bind_group) = material.bind_group() else {
            log::trace!(
                "Skipping '{}' - material '{}' has no GPU resources",
                object.name,
                material.name
            );
            continue;
        };
        render_pass.set_bind_group(MATERIAL_GROUP, material_bind_group, &[]);
        render_pass.draw_object(object, TRANSFORM_GROUP);
    }
}

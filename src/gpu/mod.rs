//! Surface, device and the two render passes.
//!
//! Each frame clears to near black, draws the ornaments with depth writes,
//! then blends the foliage on top without writing depth.

mod camera;
mod foliage;
mod mesh;
mod ornaments;

use std::sync::Arc;

use glam::{Mat4, Vec3};
use winit::window::Window;

pub use camera::Camera;

use crate::error::GpuError;
use crate::scene::TreeScene;
use crate::shaders::{FoliageUniforms, SceneUniforms};
use foliage::FoliagePass;
use ornaments::OrnamentPass;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// The whole scene is drawn shifted down so the tree sits in the middle of
/// the view.
pub const SCENE_ORIGIN: Vec3 = Vec3::new(0.0, -2.0, 0.0);

/// #050505
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0015,
    g: 0.0015,
    b: 0.0015,
    a: 1.0,
};

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    foliage: FoliagePass,
    ornaments: OrnamentPass,
    pub camera: Camera,
}

impl GpuState {
    /// Bring up the GPU for `window` and upload the static parts of `scene`.
    pub async fn new(window: Arc<Window>, scene: &TreeScene) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let foliage = FoliagePass::new(&device, surface_format, scene.foliage());
        let ornaments = OrnamentPass::new(&device, surface_format, &[scene.baubles(), scene.gifts()]);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            foliage,
            ornaments,
            camera: Camera::new(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            log::debug!("Resizing surface to {}x{}", new_size.width, new_size.height);
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size.
    pub fn reconfigure(&mut self) {
        self.resize(winit::dpi::PhysicalSize {
            width: self.config.width,
            height: self.config.height,
        });
    }

    fn update_uniforms(&mut self, scene: &TreeScene, time: f32) {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let view_proj = self.camera.projection_matrix(aspect)
            * self.camera.view_matrix()
            * Mat4::from_translation(SCENE_ORIGIN);

        let palette = &scene.config().palette;
        let viewport = [self.config.width as f32, self.config.height as f32];
        self.foliage.update(
            &self.queue,
            &FoliageUniforms::new(view_proj, palette, viewport, time, scene.foliage_progress()),
        );

        let lights = SceneUniforms::new(view_proj, self.camera.position(), SCENE_ORIGIN, palette);
        self.ornaments.update(&self.queue, &lights, &[scene.baubles(), scene.gifts()]);
    }

    pub fn render(&mut self, scene: &TreeScene, time: f32) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms(scene, time);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Opaque first so the points are depth tested against them.
            self.ornaments.draw(&mut render_pass);
            self.foliage.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

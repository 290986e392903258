//! GPU presentation using wgpu
//!
//! The canvas itself is rasterized on the CPU. This module mirrors the
//! canvas buffer into a texture (only damaged rectangles are re-uploaded),
//! blits the visible corner into the area below the menu bar and draws the
//! egui overlay on top.

use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::geometry::{Rect, Size};

/// Uniforms for the blit shader
#[repr(C, align(16))]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct BlitUniforms {
    /// Fraction of the canvas texture covered by the viewport
    uv_scale: [f32; 2],
    _padding: [f32; 2],
}

/// Placement of the canvas inside the window, in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasArea {
    /// Rows taken by the menu bar above the canvas
    pub top: u32,
    pub size: Size,
}

/// Tessellated egui output for one frame
pub struct Overlay<'a> {
    pub primitives: &'a [egui::ClippedPrimitive],
    pub textures: &'a egui::TexturesDelta,
    pub pixels_per_point: f32,
}

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    max_texture_dimension: u32,

    // Mirror of the canvas buffer
    canvas_texture: wgpu::Texture,
    canvas_view: wgpu::TextureView,
    canvas_texture_size: Size,
    canvas_sampler: wgpu::Sampler,

    blit_pipeline: wgpu::RenderPipeline,
    blit_uniform_buffer: wgpu::Buffer,
    blit_bind_group: wgpu::BindGroup,

    egui_renderer: egui_wgpu::Renderer,
    background: wgpu::Color,
}

impl Renderer {
    pub async fn new(window: Arc<winit::window::Window>, size: PhysicalSize<u32>) -> Result<Self> {
        log::info!("🔧 Renderer::new() starting...");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all() & !wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find suitable adapter")?;

        let adapter_info = adapter.get_info();
        log::info!("✅ Adapter acquired: {:?} (backend: {:?})", adapter_info.name, adapter_info.backend);

        let adapter_limits = adapter.limits();
        let max_texture_dimension = adapter_limits.max_texture_dimension_2d;
        log::info!("📏 Max texture dimension: {}", max_texture_dimension);

        // The canvas buffer grows with the window, so take the adapter's real texture limit
        let mut device_limits = wgpu::Limits::default();
        device_limits.max_texture_dimension_2d = adapter_limits.max_texture_dimension_2d;
        device_limits.max_texture_dimension_1d = adapter_limits.max_texture_dimension_1d;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Scribble Device"),
                required_features: wgpu::Features::empty(),
                required_limits: device_limits,
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);
        log::info!("Selected surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.min(max_texture_dimension),
            height: size.height.min(max_texture_dimension),
            present_mode,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        if config.width > 0 && config.height > 0 {
            surface.configure(&device, &config);
        } else {
            log::warn!("Skipping surface configuration (invalid size: {}x{})", config.width, config.height);
        }

        let canvas_texture_size = Size::new(1, 1);
        let (canvas_texture, canvas_view) = Self::create_canvas_texture(&device, canvas_texture_size);

        // Canvas pixels map 1:1 onto the surface, so no filtering is needed
        let canvas_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Canvas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let (blit_pipeline, blit_bind_group_layout) = Self::create_blit_pipeline(&device, surface_format);
        let blit_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Blit Uniform Buffer"),
            contents: bytemuck::cast_slice(&[BlitUniforms {
                uv_scale: [1.0, 1.0],
                _padding: [0.0; 2],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let blit_bind_group = Self::create_blit_bind_group(
            &device,
            &blit_bind_group_layout,
            &canvas_view,
            &canvas_sampler,
            &blit_uniform_buffer,
        );

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, egui_wgpu::RendererOptions::default());

        let [r, g, b, a] = Color::WHITE.to_linear_rgba_f64();
        log::info!("✅ Renderer initialized: {}x{}, surface: {:?}", size.width, size.height, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            max_texture_dimension,
            canvas_texture,
            canvas_view,
            canvas_texture_size,
            canvas_sampler,
            blit_pipeline,
            blit_uniform_buffer,
            blit_bind_group,
            egui_renderer,
            background: wgpu::Color { r, g, b, a },
        })
    }

    fn create_canvas_texture(device: &wgpu::Device, size: Size) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Canvas Texture"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        (texture, view)
    }

    fn create_blit_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        uniforms: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        })
    }

    fn create_blit_pipeline(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
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
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group_layout)
    }

    /// Resize the surface
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        let clamped_width = new_size.width.min(self.max_texture_dimension);
        let clamped_height = new_size.height.min(self.max_texture_dimension);
        if clamped_width != new_size.width || clamped_height != new_size.height {
            log::warn!(
                "⚠️ Resize {}x{} exceeds max texture size {}, clamping to {}x{}",
                new_size.width,
                new_size.height,
                self.max_texture_dimension,
                clamped_width,
                clamped_height
            );
        }

        self.config.width = clamped_width;
        self.config.height = clamped_height;
        self.surface.configure(&self.device, &self.config);
        log::debug!("Surface resized to: {}x{}", clamped_width, clamped_height);
    }

    /// Copy the damaged regions of the canvas buffer into the texture
    ///
    /// A buffer whose size changed is uploaded whole into a fresh texture.
    pub fn upload(&mut self, canvas: &Canvas, damage: &[Rect]) {
        let buffer_size = canvas.buffer_size();
        let wanted = Size::new(
            buffer_size.width.clamp(1, self.max_texture_dimension),
            buffer_size.height.clamp(1, self.max_texture_dimension),
        );

        if wanted != self.canvas_texture_size {
            let (texture, view) = Self::create_canvas_texture(&self.device, wanted);
            self.canvas_texture = texture;
            self.canvas_view = view;
            self.canvas_texture_size = wanted;
            self.blit_bind_group = Self::create_blit_bind_group(
                &self.device,
                &self.blit_pipeline.get_bind_group_layout(0),
                &self.canvas_view,
                &self.canvas_sampler,
                &self.blit_uniform_buffer,
            );
            log::debug!("Canvas texture recreated: {}x{}", wanted.width, wanted.height);
            self.write_region(canvas, Rect::from_size(wanted));
            return;
        }

        for region in damage {
            self.write_region(canvas, *region);
        }
    }

    fn write_region(&self, canvas: &Canvas, region: Rect) {
        let Some(region) = region.clipped_to(self.canvas_texture_size) else {
            return;
        };
        let Some(region) = region.clipped_to(canvas.buffer_size()) else {
            return;
        };

        let (x0, y0) = (region.x as u32, region.y as u32);
        let buffer = canvas.buffer();
        let mut rgba = Vec::with_capacity((region.width * region.height * 4) as usize);
        for y in y0..y0 + region.height {
            for x in x0..x0 + region.width {
                let [r, g, b] = buffer.get_pixel(x, y).0;
                rgba.extend_from_slice(&[r, g, b, 255]);
            }
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.canvas_texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: x0, y: y0, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(region.width * 4),
                rows_per_image: Some(region.height),
            },
            wgpu::Extent3d {
                width: region.width,
                height: region.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Render a frame: canvas blit followed by the egui overlay
    pub fn render(&mut self, area: CanvasArea, overlay: Overlay<'_>) {
        if self.config.width == 0 || self.config.height == 0 {
            return;
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::error!("Failed to get surface texture: {:?}", e);
                return;
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Keep the viewport inside the surface
        let top = area.top.min(self.config.height);
        let width = area.size.width.min(self.config.width);
        let height = area.size.height.min(self.config.height - top);

        self.queue.write_buffer(
            &self.blit_uniform_buffer,
            0,
            bytemuck::cast_slice(&[BlitUniforms {
                uv_scale: [
                    width as f32 / self.canvas_texture_size.width as f32,
                    height as f32 / self.canvas_texture_size.height as f32,
                ],
                _padding: [0.0; 2],
            }]),
        );

        for (id, image_delta) in &overlay.textures.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: overlay.pixels_per_point,
        };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        let egui_commands = self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            overlay.primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if width > 0 && height > 0 {
                render_pass.set_viewport(0.0, top as f32, width as f32, height as f32, 0.0, 1.0);
                render_pass.set_pipeline(&self.blit_pipeline);
                render_pass.set_bind_group(0, &self.blit_bind_group, &[]);
                render_pass.draw(0..6, 0..1);
            }
        }

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            });
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, overlay.primitives, &screen_descriptor);
        }

        self.queue
            .submit(egui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        for id in &overlay.textures.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

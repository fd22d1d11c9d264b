//! wgpu-backed scene renderer
//!
//! Draws every particle node as instanced, billboarded sprite quads
//! sharing the scene's particle material, plus the optional world-axes
//! overlay. Frame capture for snapshot export renders offscreen at the
//! configured pixel ratio and reads the pixels back.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use nalgebra::Matrix4;
use particlize_core::{Error, Result, SpritePreset};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;
use crate::collaborators::SceneRenderer;
use crate::scene::Scene;
use crate::shaders;

/// Extra draw pass composited over the scene (the egui layer)
pub type Overlay = Box<
    dyn FnMut(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView, [u32; 2]),
>;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CAPTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Uniform data shared by both pipelines
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    fog_color_density: [f32; 4],
    params: [f32; 4],
}

/// Vertex data for the axes overlay
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct AxisVertex {
    position: [f32; 3],
    color: [f32; 3],
}

/// nalgebra projections target OpenGL clip space; wgpu wants z in [0, 1]
#[rustfmt::skip]
fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// GPU renderer for the particle scene
pub struct GpuRenderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    particle_pipeline: wgpu::RenderPipeline,
    capture_particle_pipeline: wgpu::RenderPipeline,
    axes_pipeline: wgpu::RenderPipeline,
    capture_axes_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    sprite_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    sprite_cache: HashMap<u32, Arc<wgpu::BindGroup>>,
    pixel_ratio: f32,
    overlay: Option<Overlay>,
}

impl GpuRenderer {
    /// Create a renderer drawing into the given window
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| Error::Render(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| Error::Render("no compatible GPU adapter".to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .map_err(|e| Error::Render(format!("failed to acquire device: {e}")))?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(
            &device,
            surface_config.width,
            surface_config.height,
        );

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let sprite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let particle_pipeline = create_particle_pipeline(
            &device,
            &globals_layout,
            &sprite_layout,
            surface_format,
        );
        let capture_particle_pipeline = create_particle_pipeline(
            &device,
            &globals_layout,
            &sprite_layout,
            CAPTURE_FORMAT,
        );
        let axes_pipeline = create_axes_pipeline(&device, &globals_layout, surface_format);
        let capture_axes_pipeline = create_axes_pipeline(&device, &globals_layout, CAPTURE_FORMAT);

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            depth_view,
            particle_pipeline,
            capture_particle_pipeline,
            axes_pipeline,
            capture_axes_pipeline,
            globals_buffer,
            globals_bind_group,
            sprite_layout,
            sampler,
            sprite_cache: HashMap::new(),
            pixel_ratio: 1.0,
            overlay: None,
        })
    }

    /// Shared device handle, for composited layers such as the GUI
    pub fn device_handle(&self) -> Arc<wgpu::Device> {
        Arc::clone(&self.device)
    }

    /// Shared queue handle
    pub fn queue_handle(&self) -> Arc<wgpu::Queue> {
        Arc::clone(&self.queue)
    }

    /// Format of the display surface
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// Install an extra draw pass composited over each displayed frame.
    /// The overlay is not part of captured snapshots.
    pub fn set_overlay(&mut self, overlay: Overlay) {
        self.overlay = Some(overlay);
    }

    fn write_globals(&self, scene: &Scene, camera: &Camera) {
        let material = scene.material.as_ref();
        let fog = scene.fog;
        let globals = Globals {
            view: camera.view_matrix().into(),
            proj: (opengl_to_wgpu() * camera.projection_matrix()).into(),
            fog_color_density: match fog {
                Some(fog) => [fog.color[0], fog.color[1], fog.color[2], fog.density],
                None => [1.0, 1.0, 1.0, 0.0],
            },
            params: [
                material.map_or(0.5, |m| m.size),
                material.map_or(0.5, |m| m.alpha_test),
                material.map_or(1.0, |m| if m.size_attenuation { 1.0 } else { 0.0 }),
                if fog.is_some() { 1.0 } else { 0.0 },
            ],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
    }

    /// Upload the sprite texture on first use; later lookups hit the
    /// cache by preset id
    fn sprite_bind_group(&mut self, sprite: &SpritePreset) -> Arc<wgpu::BindGroup> {
        if !self.sprite_cache.contains_key(&sprite.id) {
            let (width, height) = sprite.image.dimensions();
            let texture = self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("sprite"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            self.queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                sprite.image.as_raw(),
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("sprite_bind_group"),
                layout: &self.sprite_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });
            self.sprite_cache.insert(sprite.id, Arc::new(bind_group));
        }
        Arc::clone(&self.sprite_cache[&sprite.id])
    }

    fn encode_scene_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        scene: &Scene,
        sprite_bind_group: Option<Arc<wgpu::BindGroup>>,
        capture: bool,
    ) {
        let instances: Vec<[f32; 3]> = scene
            .nodes
            .iter()
            .flat_map(|node| node.geometry.positions.iter().map(|p| [p.x, p.y, p.z]))
            .collect();

        let instance_buffer = (!instances.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("particle_instances"),
                    contents: bytemuck::cast_slice(&instances),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let axes_buffer = scene.axes_visible.then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("axes_vertices"),
                    contents: bytemuck::cast_slice(&axes_vertices()),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(BACKGROUND),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let (Some(sprite_bind_group), Some(instance_buffer)) =
            (&sprite_bind_group, &instance_buffer)
        {
            pass.set_pipeline(if capture {
                &self.capture_particle_pipeline
            } else {
                &self.particle_pipeline
            });
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_bind_group(1, sprite_bind_group.as_ref(), &[]);
            pass.set_vertex_buffer(0, instance_buffer.slice(..));
            pass.draw(0..4, 0..instances.len() as u32);
        }

        if let Some(axes_buffer) = &axes_buffer {
            pass.set_pipeline(if capture {
                &self.capture_axes_pipeline
            } else {
                &self.axes_pipeline
            });
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_vertex_buffer(0, axes_buffer.slice(..));
            pass.draw(0..6, 0..1);
        }
    }
}

impl SceneRenderer for GpuRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                self.surface
                    .get_current_texture()
                    .map_err(|e| Error::Render(format!("surface unavailable: {e}")))?
            }
            Err(e) => return Err(Error::Render(format!("surface unavailable: {e}"))),
        };
        let color_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.write_globals(scene, camera);
        let sprite_bind_group = scene
            .material
            .as_ref()
            .map(|material| self.sprite_bind_group(&material.sprite));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        self.encode_scene_pass(
            &mut encoder,
            &color_view,
            &self.depth_view,
            scene,
            sprite_bind_group,
            false,
        );

        if let Some(overlay) = &mut self.overlay {
            overlay(
                &self.device,
                &self.queue,
                &mut encoder,
                &color_view,
                [self.surface_config.width, self.surface_config.height],
            );
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio.max(0.1);
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn capture_frame(&mut self, scene: &Scene, camera: &Camera) -> Result<image::RgbaImage> {
        let width = ((self.surface_config.width as f32 * self.pixel_ratio) as u32).max(1);
        let height = ((self.surface_config.height as f32 * self.pixel_ratio) as u32).max(1);

        let color_texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("capture_color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CAPTURE_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = create_depth_view(&self.device, width, height);

        self.write_globals(scene, camera);
        let sprite_bind_group = scene
            .material
            .as_ref()
            .map(|material| self.sprite_bind_group(&material.sprite));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("capture_encoder"),
            });
        self.encode_scene_pass(
            &mut encoder,
            &color_view,
            &depth_view,
            scene,
            sprite_bind_group,
            true,
        );

        // Copy rows padded to wgpu's row-pitch alignment
        let bytes_per_row = 4 * width;
        let padded_bytes_per_row = bytes_per_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("capture_readback"),
            size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| Error::Render("readback mapping dropped".to_string()))?
            .map_err(|e| Error::Render(format!("readback mapping failed: {e:?}")))?;

        let data = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((bytes_per_row * height) as usize);
        for row in data.chunks_exact(padded_bytes_per_row as usize) {
            pixels.extend_from_slice(&row[..bytes_per_row as usize]);
        }
        drop(data);
        readback.unmap();

        image::RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| Error::Render("captured frame had unexpected size".to_string()))
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
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

fn create_particle_pipeline(
    device: &wgpu::Device,
    globals_layout: &wgpu::BindGroupLayout,
    sprite_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("particle_shader"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(shaders::PARTICLE_SHADER)),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("particle_pipeline_layout"),
        bind_group_layouts: &[globals_layout, sprite_layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("particle_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

fn create_axes_pipeline(
    device: &wgpu::Device,
    globals_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("axes_shader"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(shaders::AXES_SHADER)),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("axes_pipeline_layout"),
        bind_group_layouts: &[globals_layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("axes_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<AxisVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                    wgpu::VertexAttribute {
                        offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::LineList,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

fn axes_vertices() -> [AxisVertex; 6] {
    const EXTENT: f32 = 100.0;
    [
        AxisVertex {
            position: [0.0, 0.0, 0.0],
            color: [1.0, 0.0, 0.0],
        },
        AxisVertex {
            position: [EXTENT, 0.0, 0.0],
            color: [1.0, 0.0, 0.0],
        },
        AxisVertex {
            position: [0.0, 0.0, 0.0],
            color: [0.0, 1.0, 0.0],
        },
        AxisVertex {
            position: [0.0, EXTENT, 0.0],
            color: [0.0, 1.0, 0.0],
        },
        AxisVertex {
            position: [0.0, 0.0, 0.0],
            color: [0.0, 0.0, 1.0],
        },
        AxisVertex {
            position: [0.0, 0.0, EXTENT],
            color: [0.0, 0.0, 1.0],
        },
    ]
}

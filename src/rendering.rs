//! Rendering system with wgpu pipelines for sky, ocean, prop and rain.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::OrbitCamera;
use crate::error::GpuError;
use crate::frame::{FrameView, SceneRenderer};
use crate::light::OrbitLight;
use crate::ocean::{OceanGrid, Vertex};
use crate::params::{srgb_hex_to_linear, RecordingConfig, SkyParams};
use crate::prop::{Prop, PropVertex};
use crate::rain::ParticleRain;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Uniform buffer for skybox shader (inverse view-projection + sphere + gradient)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SkyboxUniforms {
    pub inv_view_proj: [[f32; 4]; 4],
    /// Camera position (xyz) and sphere radius (w)
    pub camera_position: [f32; 4],
    pub top_color: [f32; 4],
    pub bottom_color: [f32; 4],
}

impl SkyboxUniforms {
    pub fn new(sky: &SkyParams, view_proj: Mat4, eye: Vec3) -> Self {
        let [tr, tg, tb] = srgb_hex_to_linear(sky.top_color);
        let [br, bg, bb] = srgb_hex_to_linear(sky.bottom_color);
        Self {
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            camera_position: eye.extend(sky.radius_m).to_array(),
            top_color: [tr, tg, tb, 1.0],
            bottom_color: [br, bg, bb, 1.0],
        }
    }
}

/// Uniform buffer for prop shader (transforms + point light)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PropUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Light position (xyz) and intensity (w)
    pub light_position: [f32; 4],
    /// Light colour (rgb) and range (w)
    pub light_color: [f32; 4],
    /// Ambient floor in x
    pub ambient: [f32; 4],
}

impl PropUniforms {
    pub fn new(view_proj: Mat4, prop: &Prop, light: &OrbitLight, light_position: Vec3) -> Self {
        let [r, g, b] = light.color();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: prop.model_matrix().to_cols_array_2d(),
            light_position: light_position.extend(light.intensity()).to_array(),
            light_color: [r, g, b, light.range()],
            ambient: [light.ambient(), 0.0, 0.0, 0.0],
        }
    }
}

/// Camera state captured from the orbit controls
#[derive(Debug, Clone, Copy)]
struct CameraFrame {
    view_proj: Mat4,
    eye: Vec3,
    right: Vec3,
    up: Vec3,
}

impl CameraFrame {
    fn from_camera(camera: &OrbitCamera) -> Self {
        let (right, up) = camera.billboard_axes();
        Self {
            view_proj: camera.view_proj_matrix(),
            eye: camera.eye(),
            right,
            up,
        }
    }
}

/// GPU copy of the prop mesh, uploaded once when the prop first appears
struct PropBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Per-pipeline settings that differ between the four passes
struct PipelineDesc<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    bind_group_layout: &'a wgpu::BindGroupLayout,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    sky: SkyParams,
    camera: CameraFrame,

    skybox_pipeline: wgpu::RenderPipeline,
    skybox_uniform_buffer: wgpu::Buffer,
    skybox_bind_group: wgpu::BindGroup,

    ocean_pipeline: wgpu::RenderPipeline,
    ocean_vertex_buffer: wgpu::Buffer,
    ocean_index_buffer: wgpu::Buffer,
    ocean_index_count: u32,
    ocean_uniform_buffer: wgpu::Buffer,
    ocean_bind_group: wgpu::BindGroup,

    prop_pipeline: wgpu::RenderPipeline,
    prop_uniform_buffer: wgpu::Buffer,
    prop_bind_group: wgpu::BindGroup,
    prop_buffers: Option<PropBuffers>,

    rain_pipeline: wgpu::RenderPipeline,
    rain_instance_buffer: wgpu::Buffer,
    rain_count: u32,
    rain_uniform_buffer: wgpu::Buffer,
    rain_bind_group: wgpu::BindGroup,

    recording_config: Option<RecordingConfig>,
    frame_num: usize,
}

impl RenderSystem {
    /// Create new rendering system
    ///
    /// The ocean grid and the initial rain positions are uploaded here; the
    /// grid buffer is never written again.
    pub async fn new(
        window: Arc<Window>,
        ocean_grid: &OceanGrid,
        rain: &ParticleRain,
        camera: &OrbitCamera,
        sky: SkyParams,
        recording_config: Option<RecordingConfig>,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;
        log::info!("Surface format: {:?}", surface_format);

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;

        // Frame capture copies out of the swapchain texture
        if recording_config.is_some() {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_texture(&device, &config);

        let skybox_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/skybox.wgsl").into()),
        });
        let ocean_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ocean Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/ocean.wgsl").into()),
        });
        let prop_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Prop Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/prop.wgsl").into()),
        });
        let rain_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Rain Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rain.wgsl").into()),
        });

        let camera = CameraFrame::from_camera(camera);

        // Skybox
        let skybox_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SkyboxUniforms::new(
                &sky,
                camera.view_proj,
                camera.eye,
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let (skybox_layout, skybox_bind_group) =
            uniform_bind_group(&device, "Skybox", &skybox_uniform_buffer);
        let skybox_pipeline = create_pipeline(
            &device,
            config.format,
            &PipelineDesc {
                label: "Skybox Pipeline",
                shader: &skybox_shader,
                bind_group_layout: &skybox_layout,
                buffers: &[],
                blend: None,
                depth_write: false,
                depth_compare: wgpu::CompareFunction::Always,
            },
        );

        // Ocean
        let ocean_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ocean Vertex Buffer"),
            contents: bytemuck::cast_slice(ocean_grid.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ocean_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ocean Index Buffer"),
            contents: bytemuck::cast_slice(ocean_grid.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let ocean_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Ocean Uniform Buffer"),
            size: std::mem::size_of::<crate::ocean::OceanUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let (ocean_layout, ocean_bind_group) =
            uniform_bind_group(&device, "Ocean", &ocean_uniform_buffer);
        let ocean_attributes = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
        let ocean_pipeline = create_pipeline(
            &device,
            config.format,
            &PipelineDesc {
                label: "Ocean Pipeline",
                shader: &ocean_shader,
                bind_group_layout: &ocean_layout,
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &ocean_attributes,
                }],
                blend: None,
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        // Prop
        let prop_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Prop Uniform Buffer"),
            size: std::mem::size_of::<PropUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let (prop_layout, prop_bind_group) =
            uniform_bind_group(&device, "Prop", &prop_uniform_buffer);
        let prop_attributes =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];
        let prop_pipeline = create_pipeline(
            &device,
            config.format,
            &PipelineDesc {
                label: "Prop Pipeline",
                shader: &prop_shader,
                bind_group_layout: &prop_layout,
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<PropVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &prop_attributes,
                }],
                blend: None,
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        // Rain: one camera-facing quad per instance
        let rain_instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Rain Instance Buffer"),
            contents: bytemuck::cast_slice(rain.positions()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let rain_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Rain Uniform Buffer"),
            size: std::mem::size_of::<crate::rain::RainUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let (rain_layout, rain_bind_group) =
            uniform_bind_group(&device, "Rain", &rain_uniform_buffer);
        let rain_attributes = wgpu::vertex_attr_array![0 => Float32x3];
        let rain_pipeline = create_pipeline(
            &device,
            config.format,
            &PipelineDesc {
                label: "Rain Pipeline",
                shader: &rain_shader,
                bind_group_layout: &rain_layout,
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &rain_attributes,
                }],
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        log::info!(
            "Renderer ready: {} ocean triangles, {} rain drops",
            ocean_grid.indices().len() / 3,
            rain.len()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            sky,
            camera,
            skybox_pipeline,
            skybox_uniform_buffer,
            skybox_bind_group,
            ocean_pipeline,
            ocean_vertex_buffer,
            ocean_index_buffer,
            ocean_index_count: ocean_grid.indices().len() as u32,
            ocean_uniform_buffer,
            ocean_bind_group,
            prop_pipeline,
            prop_uniform_buffer,
            prop_bind_group,
            prop_buffers: None,
            rain_pipeline,
            rain_instance_buffer,
            rain_count: rain.len() as u32,
            rain_uniform_buffer,
            rain_bind_group,
            recording_config,
            frame_num: 0,
        })
    }

    /// Current surface size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Number of frames captured to disk so far
    pub fn frames_captured(&self) -> usize {
        self.frame_num
    }

    /// Resize surface and depth buffer; zero-sized (minimised) windows are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Reconfigure the surface at its current size (after Lost/Outdated)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_texture(&self.device, &self.config);
    }

    /// Take the view for the next frame from the orbit controls
    pub fn set_camera(&mut self, camera: &OrbitCamera) {
        self.camera = CameraFrame::from_camera(camera);
    }

    fn upload_prop(&self, prop: &Prop) -> PropBuffers {
        let mesh = prop.mesh();
        PropBuffers {
            vertex_buffer: self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Prop Vertex Buffer"),
                    contents: bytemuck::cast_slice(mesh.vertices()),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
            index_buffer: self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Prop Index Buffer"),
                    contents: bytemuck::cast_slice(mesh.indices()),
                    usage: wgpu::BufferUsages::INDEX,
                }),
            index_count: mesh.indices().len() as u32,
        }
    }

    /// Render a frame (and capture it when recording)
    fn render(&mut self, draw_prop: bool) -> Result<(), wgpu::SurfaceError> {
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
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Sky first, behind everything
            render_pass.set_pipeline(&self.skybox_pipeline);
            render_pass.set_bind_group(0, &self.skybox_bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle

            render_pass.set_pipeline(&self.ocean_pipeline);
            render_pass.set_bind_group(0, &self.ocean_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.ocean_vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(self.ocean_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.ocean_index_count, 0, 0..1);

            if let Some(prop) = self.prop_buffers.as_ref().filter(|_| draw_prop) {
                render_pass.set_pipeline(&self.prop_pipeline);
                render_pass.set_bind_group(0, &self.prop_bind_group, &[]);
                render_pass.set_vertex_buffer(0, prop.vertex_buffer.slice(..));
                render_pass.set_index_buffer(prop.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..prop.index_count, 0, 0..1);
            }

            // Transparent rain last
            render_pass.set_pipeline(&self.rain_pipeline);
            render_pass.set_bind_group(0, &self.rain_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.rain_instance_buffer.slice(..));
            render_pass.draw(0..6, 0..self.rain_count);
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        if let Some(config) = &self.recording_config {
            self.capture_frame(self.frame_num, config, &output);
            self.frame_num += 1;
        }

        output.present();

        Ok(())
    }

    /// Capture a frame to disk (recording mode only)
    fn capture_frame(
        &self,
        frame_num: usize,
        config: &RecordingConfig,
        texture: &wgpu::SurfaceTexture,
    ) {
        let (width, height) = self.size();
        let bytes_per_pixel = 4; // RGBA8 / BGRA8
        let unpadded_bytes_per_row = width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Capture Buffer"),
            size: (padded_bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Capture Encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
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

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, |_| {});
        self.device.poll(wgpu::Maintain::Wait);

        let data = buffer_slice.get_mapped_range();
        let mut image_data = vec![0u8; (width * height * bytes_per_pixel) as usize];

        // Remove row padding
        for y in 0..height {
            let padded_offset = (y * padded_bytes_per_row) as usize;
            let unpadded_offset = (y * unpadded_bytes_per_row) as usize;
            image_data[unpadded_offset..unpadded_offset + unpadded_bytes_per_row as usize]
                .copy_from_slice(
                    &data[padded_offset..padded_offset + unpadded_bytes_per_row as usize],
                );
        }

        drop(data);
        buffer.unmap();

        if is_bgra(self.config.format) {
            bgra_to_rgba(&mut image_data);
        }

        let frame_path = config.frame_path(frame_num);
        if let Err(e) = image::save_buffer(
            &frame_path,
            &image_data,
            width,
            height,
            image::ColorType::Rgba8,
        ) {
            log::error!("Failed to save frame {}: {}", frame_num, e);
        }
    }
}

impl SceneRenderer for RenderSystem {
    type Error = wgpu::SurfaceError;

    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), Self::Error> {
        let camera = self.camera;

        self.queue.write_buffer(
            &self.skybox_uniform_buffer,
            0,
            bytemuck::cast_slice(&[SkyboxUniforms::new(
                &self.sky,
                camera.view_proj,
                camera.eye,
            )]),
        );

        self.queue.write_buffer(
            &self.ocean_uniform_buffer,
            0,
            bytemuck::cast_slice(&[frame.waves.uniforms(camera.view_proj)]),
        );

        if frame.rain_dirty {
            self.queue.write_buffer(
                &self.rain_instance_buffer,
                0,
                bytemuck::cast_slice(frame.rain.positions()),
            );
        }
        self.queue.write_buffer(
            &self.rain_uniform_buffer,
            0,
            bytemuck::cast_slice(&[frame
                .rain
                .uniforms(camera.view_proj, camera.right, camera.up)]),
        );

        if let Some(prop) = frame.prop {
            if self.prop_buffers.is_none() {
                self.prop_buffers = Some(self.upload_prop(prop));
            }
            self.queue.write_buffer(
                &self.prop_uniform_buffer,
                0,
                bytemuck::cast_slice(&[PropUniforms::new(
                    camera.view_proj,
                    prop,
                    frame.light,
                    frame.light_position,
                )]),
            );
        }

        self.render(frame.prop.is_some())
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

/// Layout and bind group for a single uniform buffer at binding 0
fn uniform_bind_group(
    device: &wgpu::Device,
    name: &str,
    buffer: &wgpu::Buffer,
) -> (wgpu::BindGroupLayout, wgpu::BindGroup) {
    let layout_label = format!("{} Bind Group Layout", name);
    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&layout_label),
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

    let group_label = format!("{} Bind Group", name);
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&group_label),
        layout: &layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });

    (layout, bind_group)
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    desc: &PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: &[desc.bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Ocean is seen from below when orbiting low; props may be open meshes
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: desc.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// Swap red and blue channels in place
fn bgra_to_rgba(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

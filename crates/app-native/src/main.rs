use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use app_core::{
    clear_color, flatten_instances, AssetRecord, FrameClock, InteractionBridge, OrbInstance,
    Scene, SceneCommand, Viewport, VisualTuning, ZOOM_STEP,
};
use glam::Vec2;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    viewport: [f32; 2],
    _pad: [f32; 2],
}

const INITIAL_INSTANCE_CAPACITY: usize = 4096;

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orbs"),
            source: wgpu::ShaderSource::Wgsl(include_str!("orbs.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Quad vertices for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = Self::make_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: orb instances
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<OrbInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 8,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 3,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 4,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 32,
                        shader_location: 5,
                    },
                ],
            },
        ];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            quad_vb,
            instance_vb,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            bind_group,
            width: size.width.max(1),
            height: size.height.max(1),
        })
    }

    fn make_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: (std::mem::size_of::<OrbInstance>() * capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn render(
        &mut self,
        clear: [f32; 4],
        instances: &[OrbInstance],
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                viewport: [self.width as f32, self.height as f32],
                _pad: [0.0; 2],
            }),
        );

        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_vb = Self::make_instance_buffer(&self.device, self.instance_capacity);
        }
        self.queue
            .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(instances));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear[0] as f64,
                            g: clear[1] as f64,
                            b: clear[2] as f64,
                            a: clear[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
            rpass.draw(0..6, 0..instances.len() as u32);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Stand-in portfolio until a data feed is wired up.
fn demo_assets() -> Vec<AssetRecord> {
    let holdings: [(&str, f64, [f32; 3]); 6] = [
        ("BTC", 52_340.0, [0.96, 0.62, 0.15]),
        ("ETH", 18_210.0, [0.45, 0.52, 0.85]),
        ("SOL", 6_480.0, [0.55, 0.35, 0.92]),
        ("LINK", 2_150.0, [0.2, 0.4, 0.85]),
        ("DOT", 940.0, [0.9, 0.25, 0.55]),
        ("ATOM", 410.0, [0.3, 0.32, 0.4]),
    ];
    holdings
        .iter()
        .map(|(symbol, value, color)| {
            let mut record = AssetRecord::new(*symbol, *value);
            record.color = Some(*color);
            record
        })
        .collect()
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("Portfolio Orbs")
        .build(&event_loop)
        .expect("window");

    let size = window.inner_size();
    let mut scene = Scene::new(
        VisualTuning::default(),
        Viewport::new(size.width.max(1) as f32, size.height.max(1) as f32),
        42,
    )
    .expect("default tuning");
    scene.queue(SceneCommand::ReplaceAssets(demo_assets()));

    let mut bridge = InteractionBridge::with_defaults();
    let mut clock = FrameClock::new();
    let mut gpu = pollster::block_on(GpuState::new(&window)).expect("gpu");

    let mut paused = false;
    let mut hidden = false;
    let mut immersive = false;
    let mut dragging = false;
    let mut last_cursor: Option<Vec2> = None;
    let mut instances: Vec<OrbInstance> = Vec::new();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => {
                gpu.resize(size);
                scene.set_viewport(Viewport::new(
                    size.width.max(1) as f32,
                    size.height.max(1) as f32,
                ));
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => elwt.exit(),
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event: key, .. },
                ..
            } => {
                if key.state == ElementState::Pressed {
                    match key.physical_key {
                        PhysicalKey::Code(KeyCode::Space) => {
                            paused = !paused;
                            scene.queue(SceneCommand::SetPaused(paused));
                        }
                        PhysicalKey::Code(KeyCode::KeyH) => {
                            hidden = !hidden;
                            scene.queue(SceneCommand::SetBalancesHidden(hidden));
                        }
                        PhysicalKey::Code(KeyCode::KeyV) => {
                            immersive = !immersive;
                            scene.queue(SceneCommand::SetImmersive(immersive));
                        }
                        PhysicalKey::Code(KeyCode::ArrowLeft) => {
                            scene.queue(SceneCommand::Rotate(Vec2::new(-0.05, 0.0)));
                        }
                        PhysicalKey::Code(KeyCode::ArrowRight) => {
                            scene.queue(SceneCommand::Rotate(Vec2::new(0.05, 0.0)));
                        }
                        PhysicalKey::Code(KeyCode::ArrowUp) => {
                            scene.queue(SceneCommand::Rotate(Vec2::new(0.0, 0.03)));
                        }
                        PhysicalKey::Code(KeyCode::ArrowDown) => {
                            scene.queue(SceneCommand::Rotate(Vec2::new(0.0, -0.03)));
                        }
                        PhysicalKey::Code(KeyCode::Equal) | PhysicalKey::Code(KeyCode::NumpadAdd) => {
                            scene.queue(SceneCommand::ZoomStep(ZOOM_STEP));
                        }
                        PhysicalKey::Code(KeyCode::Minus)
                        | PhysicalKey::Code(KeyCode::NumpadSubtract) => {
                            scene.queue(SceneCommand::ZoomStep(-ZOOM_STEP));
                        }
                        PhysicalKey::Code(KeyCode::BracketLeft) => {
                            scene.queue(SceneCommand::SelectOffset(-1));
                        }
                        PhysicalKey::Code(KeyCode::BracketRight) => {
                            scene.queue(SceneCommand::SelectOffset(1));
                        }
                        _ => {}
                    }
                }
            }
            Event::WindowEvent {
                event:
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    },
                ..
            } => {
                dragging = state == ElementState::Pressed;
                if !dragging {
                    last_cursor = None;
                }
            }
            Event::WindowEvent {
                event: WindowEvent::CursorMoved { position, .. },
                ..
            } => {
                let cursor = Vec2::new(position.x as f32, position.y as f32);
                if dragging {
                    if let Some(prev) = last_cursor {
                        bridge.pointer_drag(&mut scene, cursor - prev);
                    }
                }
                last_cursor = Some(cursor);
            }
            Event::WindowEvent {
                event: WindowEvent::MouseWheel { delta, .. },
                ..
            } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * 40.0,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                bridge.wheel_zoom(&mut scene, scroll);
            }
            Event::AboutToWait => {
                let dt = clock.tick();
                scene.advance(dt);
                let cmds = scene.compose();
                instances.clear();
                flatten_instances(&cmds, &mut instances);
                match gpu.render(clear_color(&cmds), &instances) {
                    Ok(_) => gpu.window.request_redraw(),
                    Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                    Err(e) => log::error!("render error: {:?}", e),
                }
            }
            _ => {}
        })
        .unwrap();
}

use anyhow::Context as _;
use instant::Instant;
use winit::{event::ElementState, keyboard::KeyCode};

use crate::{
    camera::{Camera, CameraController},
    config::SceneConfig,
    mesh::ShapeMeshes,
    resources::registry::TextureBackend,
    scene::SceneManager,
    shader::UniformSink,
};

const KEY_BINDINGS: &str = "\
Controls:
  W/S        move forward/backward
  A/D        move left/right
  Q/E        move up/down
  mouse      look around
  scroll     change movement speed
  1/2/3      front/side/top orthographic view
  4          perspective view
  Esc        quit";

/// Owns everything a running still-life needs and wires it together.
///
/// The host supplies the three collaborators: a texture backend, the shape
/// meshes and a uniform sink, and forwards window input to the context.
pub struct Context<B: TextureBackend, M: ShapeMeshes, S: UniformSink> {
    pub config: SceneConfig,
    pub camera: Camera,
    pub controller: CameraController,
    pub shader: S,
    scene: SceneManager<B, M>,
    last_frame: Instant,
}

impl<B, M, S> Context<B, M, S>
where
    B: TextureBackend,
    M: ShapeMeshes,
    S: UniformSink,
{
    pub fn new(config: SceneConfig, backend: B, meshes: Option<M>, shader: S) -> Self {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
        log::info!("{}", KEY_BINDINGS);

        let scene = SceneManager::new(&config, backend, meshes);
        Self {
            config,
            camera: Camera::default(),
            controller: CameraController::new(),
            shader,
            scene,
            last_frame: Instant::now(),
        }
    }

    pub fn scene(&self) -> &SceneManager<B, M> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneManager<B, M> {
        &mut self.scene
    }

    pub fn prepare(&mut self) {
        self.scene.prepare(&mut self.shader);
        self.last_frame = Instant::now();
    }

    /// Returns whether the key was consumed.
    pub fn key_input(&mut self, key: KeyCode, state: ElementState) -> bool {
        self.controller.process_keyboard(key, state)
    }

    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        // screen y grows downwards
        self.camera.process_mouse_movement(dx as f32, -dy as f32);
    }

    pub fn mouse_scroll(&mut self, lines: f32) {
        self.camera.process_mouse_scroll(lines);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.window_width = width;
            self.config.window_height = height;
        }
    }

    pub fn exit_requested(&self) -> bool {
        self.controller.exit_requested()
    }

    /// Advance the camera by the time since the last frame and draw the scene.
    pub fn frame(&mut self) {
        let dt = self.last_frame.elapsed().as_secs_f32();
        self.last_frame = Instant::now();
        self.frame_with(dt);
    }

    /// Like [`Context::frame`] with an explicit time step in seconds.
    pub fn frame_with(&mut self, dt: f32) {
        self.controller.update_camera(&mut self.camera, dt);
        self.camera.prepare_view(
            &mut self.shader,
            self.config.window_width,
            self.config.window_height,
        );
        self.scene.render(&mut self.shader);
    }
}

/// Request a device and queue from the default adapter, compatible with
/// `surface` when one is given. Hosts without a window pass `None`.
pub async fn request_device(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'_>>,
) -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .context("no suitable GPU adapter")?;
    log::info!("Using adapter {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("still-life device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        })
        .await
        .context("could not create GPU device")?;
    Ok((device, queue))
}

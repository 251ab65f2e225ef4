//! Camera, projection and keyboard/mouse controller.
//!
//! The camera flies freely through the scene in perspective mode. Four view
//! presets snap it to fixed front, side and top orthographic views or back to
//! the default perspective pose. All matrices use OpenGL clip conventions;
//! conversion to WGPU's depth range happens when uniforms are packed.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, Vector3, perspective};
use winit::{event::ElementState, keyboard::KeyCode};

use crate::shader::{LightField, Uniform, UniformSink};

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;
/// Half extent of the orthographic view volume along its longer axis.
const ORTHO_HALF_EXTENT: f32 = 5.0;
const MAX_PITCH: f32 = 89.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPreset {
    Front,
    Side,
    Top,
    Perspective,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub front: Vector3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub yaw: Deg<f32>,
    pub pitch: Deg<f32>,
    pub projection: ProjectionMode,
}

impl Camera {
    /// A perspective camera at `position` looking along `front`.
    pub fn looking(position: Point3<f32>, front: Vector3<f32>, up: Vector3<f32>) -> Self {
        let mut camera = Self {
            position,
            front,
            up,
            zoom: 80.0,
            movement_speed: 20.0,
            mouse_sensitivity: 0.1,
            yaw: Deg(-90.0),
            pitch: Deg(0.0),
            projection: ProjectionMode::Perspective,
        };
        camera.sync_angles();
        camera
    }

    fn sync_angles(&mut self) {
        let front = self.front.normalize();
        self.yaw = Deg::from(cgmath::Rad(front.z.atan2(front.x)));
        self.pitch = Deg::from(cgmath::Rad(front.y.clamp(-1.0, 1.0).asin()));
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.front, self.up)
    }

    pub fn projection_matrix(&self, width: u32, height: u32) -> Matrix4<f32> {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        match self.projection {
            ProjectionMode::Perspective => perspective(Deg(self.zoom), width / height, NEAR, FAR),
            ProjectionMode::Orthographic => {
                // shrink the shorter axis so the view is not stretched
                let (x, y) = if width > height {
                    (ORTHO_HALF_EXTENT, ORTHO_HALF_EXTENT * height / width)
                } else {
                    (ORTHO_HALF_EXTENT * width / height, ORTHO_HALF_EXTENT)
                };
                cgmath::ortho(-x, x, -y, y, NEAR, FAR)
            }
        }
    }

    pub fn process_keyboard(&mut self, movement: Movement, dt: f32) {
        let velocity = self.movement_speed * dt;
        let front = self.front.normalize();
        let right = front.cross(self.up).normalize();
        match movement {
            Movement::Forward => self.position += front * velocity,
            Movement::Backward => self.position -= front * velocity,
            Movement::Left => self.position -= right * velocity,
            Movement::Right => self.position += right * velocity,
            Movement::Up => self.position += self.up * velocity,
            Movement::Down => self.position -= self.up * velocity,
        }
    }

    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += Deg(x_offset * self.mouse_sensitivity);
        self.pitch = Deg((self.pitch.0 + y_offset * self.mouse_sensitivity).clamp(-MAX_PITCH, MAX_PITCH));

        let (yaw_sin, yaw_cos) = cgmath::Angle::sin_cos(self.yaw);
        let (pitch_sin, pitch_cos) = cgmath::Angle::sin_cos(self.pitch);
        self.front = Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
    }

    /// Scrolling changes how fast the camera moves.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.movement_speed = (self.movement_speed + y_offset).clamp(1.0, 100.0);
    }

    pub fn apply_preset(&mut self, preset: ViewPreset) {
        let (projection, position, front, up) = match preset {
            ViewPreset::Front => (
                ProjectionMode::Orthographic,
                Point3::new(0.0, 4.0, 10.0),
                Vector3::new(0.0, 0.0, -1.0),
                Vector3::unit_y(),
            ),
            ViewPreset::Side => (
                ProjectionMode::Orthographic,
                Point3::new(10.0, 4.0, 0.0),
                Vector3::new(-1.0, 0.0, 0.0),
                Vector3::unit_y(),
            ),
            ViewPreset::Top => (
                ProjectionMode::Orthographic,
                Point3::new(0.0, 7.0, 0.0),
                Vector3::new(0.0, -1.0, 0.0),
                Vector3::new(-1.0, 0.0, 0.0),
            ),
            ViewPreset::Perspective => (
                ProjectionMode::Perspective,
                Point3::new(0.0, 5.5, 8.0),
                Vector3::new(0.0, -0.5, -2.0),
                Vector3::unit_y(),
            ),
        };
        self.projection = projection;
        self.position = position;
        self.front = front;
        self.up = up;
        self.sync_angles();
    }

    /// Write view, projection and eye position, and aim the spot light along
    /// the view direction.
    pub fn prepare_view<S: UniformSink + ?Sized>(&self, sink: &mut S, width: u32, height: u32) {
        let position = Vector3::new(self.position.x, self.position.y, self.position.z);
        sink.set_mat4(Uniform::View, self.view_matrix());
        sink.set_mat4(Uniform::Projection, self.projection_matrix(width, height));
        sink.set_vec3(Uniform::ViewPosition, position);
        sink.set_vec3(Uniform::SpotLight(LightField::Position), position);
        sink.set_vec3(Uniform::SpotLight(LightField::Direction), self.front);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking(
            Point3::new(0.0, 5.5, 8.0),
            Vector3::new(0.0, -0.5, -2.0),
            Vector3::unit_y(),
        )
    }
}

/// Tracks which movement keys are held and feeds the camera every frame.
#[derive(Clone, Debug, Default)]
pub struct CameraController {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    pending_preset: Option<ViewPreset>,
    exit_requested: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the key is one the controller handles.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;
        match key {
            KeyCode::KeyW => self.forward = pressed,
            KeyCode::KeyS => self.backward = pressed,
            KeyCode::KeyA => self.left = pressed,
            KeyCode::KeyD => self.right = pressed,
            KeyCode::KeyQ => self.up = pressed,
            KeyCode::KeyE => self.down = pressed,
            KeyCode::Digit1 | KeyCode::Digit2 | KeyCode::Digit3 | KeyCode::Digit4 => {
                if pressed {
                    self.pending_preset = match key {
                        KeyCode::Digit1 => Some(ViewPreset::Front),
                        KeyCode::Digit2 => Some(ViewPreset::Side),
                        KeyCode::Digit3 => Some(ViewPreset::Top),
                        _ => Some(ViewPreset::Perspective),
                    };
                }
            }
            KeyCode::Escape => self.exit_requested |= pressed,
            _ => return false,
        }
        true
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Apply a selected preset and move for every held key.
    pub fn update_camera(&mut self, camera: &mut Camera, dt: f32) {
        if let Some(preset) = self.pending_preset.take() {
            camera.apply_preset(preset);
        }
        let held = [
            (self.forward, Movement::Forward),
            (self.backward, Movement::Backward),
            (self.left, Movement::Left),
            (self.right, Movement::Right),
            (self.up, Movement::Up),
            (self.down, Movement::Down),
        ];
        for (_, movement) in held.into_iter().filter(|(held, _)| *held) {
            camera.process_keyboard(movement, dt);
        }
    }
}

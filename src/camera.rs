//! Orbit camera, perspective projection and the orbit controller.
//!
//! The camera circles around a target point. The controller turns mouse
//! drags and wheel input into pending rotation/pan/zoom, and with damping
//! enabled applies only a fraction of the pending motion per frame, so the
//! view keeps gliding for a moment after the input stops.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector2, Vector3, perspective};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

#[derive(Debug, Clone)]
pub struct Camera {
    pub target: Point3<f32>,
    pub distance: f32,
    /// Rotation around the y axis, zero looks down -z.
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, Y: Into<Rad<f32>>, T: Into<Rad<f32>>>(
        target: P,
        distance: f32,
        yaw: Y,
        pitch: T,
    ) -> Self {
        Self {
            target: target.into(),
            distance,
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Build the orbit parameters for a camera placed at `position` and
    /// looking at `target`.
    pub fn looking_at<P: Into<Point3<f32>>>(position: P, target: P) -> Self {
        let position = position.into();
        let target = target.into();
        let offset = position - target;
        let distance = offset.magnitude();
        let (yaw, pitch) = if distance > f32::EPSILON {
            (
                Rad(offset.x.atan2(offset.z)),
                Rad((offset.y / distance).clamp(-1.0, 1.0).asin()),
            )
        } else {
            (Rad(0.0), Rad(0.0))
        };
        Self {
            target,
            distance,
            yaw,
            pitch,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        self.target
            + Vector3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }

    /// Unit vectors pointing right and up on screen.
    fn screen_axes(&self) -> (Vector3<f32>, Vector3<f32>) {
        let forward = (self.target - self.position()).normalize();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward).normalize();
        (right, up)
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Recompute the aspect ratio. Zero sized viewports keep the old aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    None,
    Rotate,
    Pan,
}

#[derive(Debug)]
pub struct OrbitController {
    pub enabled: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    drag: Drag,
    cursor: Option<PhysicalPosition<f64>>,
    viewport: Vector2<f32>,
    // pending motion: (yaw, pitch) in radians, pan in pixels, zoom as a scale
    rotate_delta: Vector2<f32>,
    pan_delta: Vector2<f32>,
    zoom_scale: f32,
}

impl OrbitController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            enabled: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed,
            zoom_speed,
            min_distance: 0.5,
            max_distance: 500.0,
            drag: Drag::None,
            cursor: None,
            viewport: Vector2::new(1.0, 1.0),
            rotate_delta: Vector2::new(0.0, 0.0),
            pan_delta: Vector2::new(0.0, 0.0),
            zoom_scale: 1.0,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vector2::new(width.max(1) as f32, height.max(1) as f32);
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if !self.enabled {
            if let WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } = event
            {
                self.drag = Drag::None;
            }
            return;
        }
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.drag = match (button, state) {
                    (MouseButton::Left, ElementState::Pressed) => Drag::Rotate,
                    (MouseButton::Right, ElementState::Pressed) => Drag::Pan,
                    (_, ElementState::Released) => Drag::None,
                    _ => self.drag,
                };
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last) = self.cursor {
                    let dx = (position.x - last.x) as f32;
                    let dy = (position.y - last.y) as f32;
                    self.handle_drag(dx, dy);
                }
                self.cursor = Some(*position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.drag = Drag::None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 100.0,
                };
                self.handle_scroll(scroll);
            }
            _ => (),
        }
    }

    /// Pixel deltas while a button is held.
    pub fn handle_drag(&mut self, dx: f32, dy: f32) {
        match self.drag {
            Drag::Rotate => {
                // a drag across the full viewport height is one full turn
                let per_pixel = 2.0 * std::f32::consts::PI / self.viewport.y * self.rotate_speed;
                self.rotate_delta.x -= dx * per_pixel;
                self.rotate_delta.y += dy * per_pixel;
            }
            Drag::Pan => {
                self.pan_delta.x += dx;
                self.pan_delta.y += dy;
            }
            Drag::None => (),
        }
    }

    /// Positive values zoom in.
    pub fn handle_scroll(&mut self, scroll: f32) {
        let step = 0.95f32.powf(self.zoom_speed * scroll.abs());
        if scroll > 0.0 {
            self.zoom_scale *= step;
        } else if scroll < 0.0 {
            self.zoom_scale /= step;
        }
    }

    pub fn is_settled(&self) -> bool {
        self.rotate_delta.magnitude2() < 1e-10
            && self.pan_delta.magnitude2() < 1e-10
            && (self.zoom_scale - 1.0).abs() < 1e-6
    }

    /// Apply pending motion to `camera`. Called once per frame.
    pub fn update(&mut self, camera: &mut Camera, projection: &Projection) {
        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        camera.yaw += Rad(self.rotate_delta.x * factor);
        camera.pitch += Rad(self.rotate_delta.y * factor);
        camera.pitch = Rad(camera.pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));

        // pixels to world units at the target's depth
        let world_per_pixel =
            2.0 * camera.distance * (projection.fovy.0 / 2.0).tan() / self.viewport.y;
        let (right, up) = camera.screen_axes();
        let pan = (-right * self.pan_delta.x + up * self.pan_delta.y) * world_per_pixel * factor;
        camera.target += pan;

        camera.distance =
            (camera.distance * self.zoom_scale).clamp(self.min_distance, self.max_distance);
        self.zoom_scale = 1.0;

        if self.enable_damping {
            self.rotate_delta *= 1.0 - self.damping_factor;
            self.pan_delta *= 1.0 - self.damping_factor;
        } else {
            self.rotate_delta = Vector2::new(0.0, 0.0);
            self.pan_delta = Vector2::new(0.0, 0.0);
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
            view: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position().to_homogeneous().into();
        let view = camera.calc_matrix();
        self.view = view.into();
        self.view_proj = (projection.calc_matrix() * view).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

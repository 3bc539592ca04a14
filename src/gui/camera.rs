use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3};

const KEY_CAMERA_MOVE_UP: Key = Key::Up;
const KEY_CAMERA_MOVE_DOWN: Key = Key::Down;
const KEY_CAMERA_MOVE_LEFT: Key = Key::Left;
const KEY_CAMERA_MOVE_RIGHT: Key = Key::Right;
const KEY_CAMERA_ZOOM_IN: Key = Key::Equals;
const KEY_CAMERA_ZOOM_OUT: Key = Key::Minus;

const KEY_ANGLE_STEP: f32 = 0.1;
const KEY_ZOOM_STEP: f32 = 1.2;

// This camera is a close cousin of ArcBall: click-and-drag adjusts pitch and
// yaw, scrolling zooms. Unlike ArcBall, user input only moves *targets*; the
// live orientation glides toward them by a fixed fraction per frame, which
// gives dragging its characteristic damped feel.
//
// The camera always points at the origin with y up, matching the orbital
// plane (orbits sweep through XZ).
pub struct OrbitalCamera {
    // -- live orientation, eased toward the targets each frame --
    theta: f32,  // azimuthal angle
    phi: f32,    // polar angle
    radius: f32, // distance from origin
    // -- where user input wants the camera to be --
    target_theta: f32,
    target_phi: f32,
    target_radius: f32,
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
    znear: f32,
    zfar: f32,
    // -- other --
    last_cursor_pos: Vector2<f32>,
    // -- knobs to fiddle with --
    damping: f32,
    theta_step: f32,
    phi_step: f32,
    scroll_ratio: f32,
    phi_limit: f32,
    radius_limits: (f32, f32),
}

impl OrbitalCamera {
    pub fn new(radius: f32, phi: f32) -> Self {
        OrbitalCamera {
            theta: 0.0,
            phi,
            radius,
            target_theta: 0.0,
            target_phi: phi,
            target_radius: radius,
            width: 800,
            height: 600,
            fovy: 75.0_f32.to_radians(),
            znear: 0.1,
            zfar: 2000.0,
            last_cursor_pos: Vector2::zeros(),
            damping: 0.05,
            theta_step: 0.005,
            phi_step: 0.005,
            scroll_ratio: 1.5,
            phi_limit: 0.001,
            radius_limits: (1.0, 1500.0),
        }
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect(), self.fovy, self.znear, self.zfar)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Takes effect immediately; the next projection query sees the new
    /// aspect ratio, regardless of where the frame cycle is.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn rotate(&mut self, dtheta: f32, dphi: f32) {
        self.target_theta += dtheta;
        self.target_phi = nalgebra::clamp(
            self.target_phi + dphi,
            self.phi_limit,
            PI - self.phi_limit,
        );
    }

    pub fn zoom(&mut self, factor: f32) {
        self.target_radius = nalgebra::clamp(
            self.target_radius * factor,
            self.radius_limits.0,
            self.radius_limits.1,
        );
    }

    // One easing step, run once per frame from `update`.
    fn ease(&mut self) {
        self.theta += (self.target_theta - self.theta) * self.damping;
        self.phi += (self.target_phi - self.phi) * self.damping;
        self.radius += (self.target_radius - self.radius) * self.damping;
    }
}

impl Camera for OrbitalCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);

                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    // Rotate the opposite direction as the mouse moves (drag right == camera glides
                    // left)
                    let dpos = curr_pos - self.last_cursor_pos;
                    self.rotate(-dpos.x * self.theta_step, -dpos.y * self.phi_step);
                }

                self.last_cursor_pos = curr_pos;
            }
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == zoom in
                if off < 0.0 {
                    self.zoom(self.scroll_ratio);
                } else if off > 0.0 {
                    self.zoom(self.scroll_ratio.recip())
                }
            }
            WindowEvent::FramebufferSize(w, h) => {
                self.set_viewport(w, h);
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_UP, Action::Press, _) => {
                self.rotate(0.0, -KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_DOWN, Action::Press, _) => {
                self.rotate(0.0, KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_LEFT, Action::Press, _) => {
                self.rotate(-KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_RIGHT, Action::Press, _) => {
                self.rotate(KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_IN, Action::Press, _) => {
                self.zoom(KEY_ZOOM_STEP.recip())
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_OUT, Action::Press, _) => self.zoom(KEY_ZOOM_STEP),
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        Point3::new(
            self.radius * self.phi.sin() * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * self.phi.sin() * self.theta.cos(),
        )
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation().try_inverse().unwrap()
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.projection().znear(), self.projection().zfar())
    }

    fn update(&mut self, _canvas: &Canvas) {
        self.ease();
    }

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}

use std::cell::RefCell;
use std::f32::consts::PI;
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use kiss3d::light::Light;
use kiss3d::resource::Mesh;
use kiss3d::scene::SceneNode;
use kiss3d::text::Font;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation3, Vector3};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use super::camera::OrbitalCamera;
use crate::animation;
use crate::assets::ResolvedAsset;
use crate::registry::{BodyDescriptor, Registry};

// Where the central body is pinned: off the origin so its model doesn't sit
// exactly inside the point light.
const CENTRAL_OFFSET: [f32; 3] = [-8.0, -8.0, -8.0];

/// Half-width of an orbit guide ring, in world units.
const GUIDE_HALF_WIDTH: f64 = 0.3;
const GUIDE_SEGMENTS: u16 = 100;

const STAR_COUNT: usize = 5000;
const STAR_SEED: u64 = 20;
// Stars fill a cube this wide, centered on the origin.
const STAR_SPREAD: f32 = 2000.0;

const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(3);

// Initial vantage: above the ecliptic, pulled back far enough to frame the
// whole system.
const CAMERA_RADIUS: f32 = 206.0;
const CAMERA_PHI: f32 = 1.33;

/// A body in orbit: its static configuration plus the scene-graph node the
/// animator moves around.
struct OrbitingBody {
    descriptor: BodyDescriptor,
    node: SceneNode,
    // Orbits stay in the plane the body was attached in.
    y: f32,
}

struct Notification {
    text: String,
    shown_at: Instant,
}

pub struct View {
    // Scene state
    registry: Registry,
    asset_rx: Receiver<ResolvedAsset>,
    orbiting: Vec<OrbitingBody>,
    central: Option<SceneNode>,
    stars: Vec<(Point3<f32>, Point3<f32>)>,
    // Camera
    camera: OrbitalCamera,
    // Misc
    clock: Instant,
    notification: Option<Notification>,
}

impl View {
    pub fn new(window: &mut Window, registry: Registry, asset_rx: Receiver<ResolvedAsset>) -> Self {
        let camera = OrbitalCamera::new(CAMERA_RADIUS, CAMERA_PHI);

        // Guides don't depend on the models, so they go in right away; one
        // ring per non-central body, whatever becomes of its asset. The
        // scene graph keeps the nodes; nothing ever moves them again.
        for body in registry.orbiting() {
            add_guide(window, body.distance);
        }

        window.set_point_size(1.0);

        View {
            registry,
            asset_rx,
            orbiting: vec![],
            central: None,
            stars: generate_starfield(STAR_SEED, STAR_COUNT),
            camera,
            clock: Instant::now(),
            notification: None,
        }
    }

    /// Milliseconds since the view was created; the animator's time axis.
    pub fn elapsed_millis(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    pub fn camera_mut(&mut self) -> &mut OrbitalCamera {
        &mut self.camera
    }

    /// Drains finished asset resolutions and attaches their bodies. A body
    /// whose asset failed is dropped with a warning; the rest of the scene
    /// carries on without it.
    pub fn integrate_assets(&mut self, window: &mut Window) {
        while let Ok(resolved) = self.asset_rx.try_recv() {
            let descriptor = match self.registry.find(&resolved.body) {
                Some(descriptor) => descriptor.clone(),
                None => continue,
            };
            match resolved.result {
                Ok(path) => self.attach_body(window, descriptor, &path),
                Err(err) => warn!("dropping {} from the scene: {}", resolved.body, err),
            }
        }
    }

    fn attach_body(&mut self, window: &mut Window, descriptor: BodyDescriptor, path: &Path) {
        // Each descriptor attaches at most once; a duplicate resolution
        // would otherwise put a second copy of the body in the scene.
        let already_attached = if descriptor.is_central() {
            self.central.is_some()
        } else {
            self.orbiting.iter().any(|b| b.descriptor.name == descriptor.name)
        };
        if already_attached {
            warn!("{} is already attached, ignoring duplicate asset", descriptor.name);
            return;
        }

        let scale = descriptor.scale;
        let mtl_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut node = window.add_obj(path, mtl_dir, Vector3::new(scale, scale, scale));

        if descriptor.is_central() {
            // Pinned in place, and the point light rides along so the
            // illumination direction stays anchored to the central body no
            // matter where the camera goes.
            let [x, y, z] = CENTRAL_OFFSET;
            node.set_local_translation(Translation3::new(x, y, z));
            window.set_light(Light::Absolute(Point3::new(x, y, z)));
            info!("central body {} attached", descriptor.name);
            self.central = Some(node);
        } else {
            node.set_local_translation(Translation3::new(descriptor.distance as f32, 0.0, 0.0));
            info!("{} attached at distance {}", descriptor.name, descriptor.distance);
            self.orbiting.push(OrbitingBody {
                descriptor,
                node,
                y: 0.0,
            });
        }
    }

    /// One animator pass: every orbiting body moves to its closed-form
    /// position for time `t_millis`. Bodies still loading simply aren't in
    /// the collection yet; the central body never is.
    pub fn animate(&mut self, t_millis: f64) {
        for body in self.orbiting.iter_mut() {
            let (x, z) = animation::orbit_position(t_millis, &body.descriptor);
            body.node
                .set_local_translation(Translation3::new(x as f32, body.y, z as f32));
        }
    }

    /// Snapshot of the current orbiting collection, for persistence.
    pub fn snapshot(&self) -> serde_json::Value {
        let bodies: Vec<BodyDescriptor> = self
            .orbiting
            .iter()
            .map(|body| body.descriptor.clone())
            .collect();
        crate::registry::snapshot(&bodies)
    }

    pub fn show_notification(&mut self, text: String) {
        self.notification = Some(Notification {
            text,
            shown_at: Instant::now(),
        });
    }

    /// Immediate-mode drawing: the starfield and the HUD. Runs every frame
    /// after animation, before the scene graph is rendered.
    pub fn prerender(&mut self, window: &mut Window, fps: f64) {
        for (point, color) in self.stars.iter() {
            window.draw_point(point, color);
        }

        if let Some(notification) = &self.notification {
            if notification.shown_at.elapsed() > NOTIFICATION_LIFETIME {
                self.notification = None;
            }
        }
        if let Some(notification) = &self.notification {
            window.draw_text(
                &notification.text,
                &Point2::new(20.0, 60.0),
                80.0,
                &Font::default(),
                &Point3::new(1.0, 1.0, 1.0),
            );
        }

        window.draw_text(
            &format!("{:.0} fps", fps),
            &Point2::origin(),
            40.0,
            &Font::default(),
            &Point3::new(0.6, 0.6, 0.6),
        );
    }
}

/// Inner and outer radii of a body's orbit guide.
fn guide_radii(distance: f64) -> (f64, f64) {
    (distance - GUIDE_HALF_WIDTH, distance + GUIDE_HALF_WIDTH)
}

fn add_guide(window: &mut Window, distance: f64) {
    let (inner, outer) = guide_radii(distance);
    let (coords, faces) = ring_vertices(inner as f32, outer as f32, GUIDE_SEGMENTS);
    let mesh = Rc::new(RefCell::new(Mesh::new(coords, faces, None, None, false)));

    let mut node = window.add_mesh(mesh, Vector3::new(1.0, 1.0, 1.0));
    node.set_color(1.0, 1.0, 1.0);
    // Visible from above and below the ecliptic.
    node.enable_backface_culling(false);
}

// Annulus in the orbital (XZ) plane: a band of quads between the inner and
// outer circles, each quad split into two triangles.
fn ring_vertices(inner: f32, outer: f32, segments: u16) -> (Vec<Point3<f32>>, Vec<Point3<u16>>) {
    let mut coords = Vec::with_capacity(2 * segments as usize);
    for i in 0..segments {
        let theta = 2.0 * PI * (i as f32) / (segments as f32);
        coords.push(Point3::new(inner * theta.cos(), 0.0, inner * theta.sin()));
        coords.push(Point3::new(outer * theta.cos(), 0.0, outer * theta.sin()));
    }

    let mut faces = Vec::with_capacity(2 * segments as usize);
    for i in 0..segments {
        let a = 2 * i;
        let b = 2 * i + 1;
        let c = (2 * i + 2) % (2 * segments);
        let d = (2 * i + 3) % (2 * segments);
        faces.push(Point3::new(a, b, c));
        faces.push(Point3::new(b, d, c));
    }

    (coords, faces)
}

fn generate_starfield(seed: u64, count: usize) -> Vec<(Point3<f32>, Point3<f32>)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = (rng.random::<f32>() - 0.5) * STAR_SPREAD;
            let y = (rng.random::<f32>() - 0.5) * STAR_SPREAD;
            let z = (rng.random::<f32>() - 0.5) * STAR_SPREAD;
            // Mostly white, dimmed a little so the field has some depth.
            let brightness = 0.5 + 0.5 * rng.random::<f32>();
            (
                Point3::new(x, y, z),
                Point3::new(brightness, brightness, brightness),
            )
        })
        .collect()
}

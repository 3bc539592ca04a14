use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use self::controller::Controller;
use self::view::View;
use crate::assets::ResolvedAsset;
use crate::registry::Registry;
use crate::store::DocumentStore;

mod camera;
mod controller;
mod view;

pub use self::camera::OrbitalCamera;

pub struct Simulation {
    view: View,
    controller: Controller,
}

impl Simulation {
    pub fn new(
        window: &mut Window,
        registry: Registry,
        assets: Receiver<ResolvedAsset>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            view: View::new(window, registry, assets),
            controller: Controller::new(store),
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        // Process events
        for event in events.iter() {
            self.controller.process_event(event, &mut self.view);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(self.view.camera_mut()), None, None, None)
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());

        // Bodies whose models finished loading since the last tick join the
        // scene now; save/load outcomes become notifications.
        self.view.integrate_assets(window);
        self.controller.poll_outcomes(&mut self.view);

        // Animate, then draw. Camera easing runs inside kiss3d's render
        // pass, between this step and the actual draw.
        let now = self.view.elapsed_millis();
        self.view.animate(now);
        self.view.prerender(window, self.controller.fps());
        self.controller.increment_frame_counter();
    }
}

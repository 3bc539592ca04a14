use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

use kiss3d::event::{Action, Event, Key, WindowEvent};

use super::view::View;
use crate::store::{self, DocumentStore};

// Key config, all in one place
const KEY_SAVE_CONFIG: Key = Key::S;
const KEY_LOAD_CONFIG: Key = Key::L;

pub struct Controller {
    store: Arc<dyn DocumentStore>,
    outcome_tx: Sender<String>,
    outcome_rx: Receiver<String>,
    fps_counter: FpsCounter,
}

impl Controller {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let (outcome_tx, outcome_rx) = channel();
        Controller {
            store,
            outcome_tx,
            outcome_rx,
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: Event, view: &mut View) {
        match event.value {
            WindowEvent::Key(KEY_SAVE_CONFIG, Action::Press, _) => {
                store::spawn_save(
                    Arc::clone(&self.store),
                    view.snapshot(),
                    self.outcome_tx.clone(),
                );
            }
            WindowEvent::Key(KEY_LOAD_CONFIG, Action::Press, _) => {
                store::spawn_load(Arc::clone(&self.store), self.outcome_tx.clone());
            }
            _ => {}
        }
    }

    /// Surfaces finished save/load outcomes as on-screen notifications.
    pub fn poll_outcomes(&mut self, view: &mut View) {
        while let Ok(message) = self.outcome_rx.try_recv() {
            view.show_notification(message);
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
        }
    }
}

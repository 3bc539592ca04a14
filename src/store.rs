//! The persistence gateway: a remote key-document store.
//!
//! Documents are written and read wholesale under a fixed collection and
//! document id. Saves and loads run on detached worker threads and report
//! back with a single notification string; nothing here ever touches the
//! render loop.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Collection and document ids the configuration snapshot lives under.
pub const COLLECTION: &str = "solar_system";
pub const DOCUMENT: &str = "config";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A store-level failure. Kept distinct from the legitimate "no such
/// document" result, which `get` reports as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Transport(String),
    #[error("store returned status {0}")]
    Status(u16),
    #[error("malformed store response: {0}")]
    Payload(#[from] std::io::Error),
}

impl From<ureq::Error> for StoreError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => StoreError::Status(code),
            ureq::Error::Transport(transport) => StoreError::Transport(transport.to_string()),
        }
    }
}

/// External key-document store contract.
pub trait DocumentStore: Send + Sync {
    fn put(&self, collection: &str, document: &str, payload: &Value) -> Result<(), StoreError>;

    /// `Ok(None)` means the document does not exist; errors mean the store
    /// itself misbehaved.
    fn get(&self, collection: &str, document: &str) -> Result<Option<Value>, StoreError>;
}

/// JSON-over-HTTP store client: documents live at
/// `{base}/{collection}/{document}`.
pub struct RemoteStore {
    agent: ureq::Agent,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        RemoteStore {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, collection: &str, document: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, document)
    }
}

impl DocumentStore for RemoteStore {
    fn put(&self, collection: &str, document: &str, payload: &Value) -> Result<(), StoreError> {
        self.agent.put(&self.url(collection, document)).send_json(payload)?;
        Ok(())
    }

    fn get(&self, collection: &str, document: &str) -> Result<Option<Value>, StoreError> {
        match self.agent.get(&self.url(collection, document)).call() {
            Ok(response) => Ok(Some(response.into_json()?)),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Writes the snapshot in the background; the outcome notification lands on
/// `done`. Fire-and-forget: last write wins, no retry.
pub fn spawn_save(store: Arc<dyn DocumentStore>, payload: Value, done: Sender<String>) {
    thread::spawn(move || {
        let message = match store.put(COLLECTION, DOCUMENT, &payload) {
            Ok(()) => String::from("Configuration saved!"),
            Err(err) => {
                warn!("saving configuration failed: {}", err);
                format!("Save failed: {}", err)
            }
        };
        let _ = done.send(message);
    });
}

/// Checks for a prior snapshot in the background. The payload is write-only:
/// a hit confirms a snapshot exists, its contents are not applied back to
/// the scene.
pub fn spawn_load(store: Arc<dyn DocumentStore>, done: Sender<String>) {
    thread::spawn(move || {
        let message = match store.get(COLLECTION, DOCUMENT) {
            Ok(Some(_)) => String::from("Configuration loaded!"),
            Ok(None) => String::from("No saved configuration!"),
            Err(err) => {
                warn!("loading configuration failed: {}", err);
                format!("Load failed: {}", err)
            }
        };
        let _ = done.send(message);
    });
}

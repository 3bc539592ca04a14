//! Asynchronous resolution of body model files.
//!
//! Each descriptor's asset is resolved on its own worker thread, in no
//! particular order; completions come back over a channel the render loop
//! polls once per tick. Mesh upload has to stay on the render thread (GL
//! resources are not `Send`), so resolution covers the I/O and validation
//! half of loading.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::{fs, thread};

use thiserror::Error;

use crate::registry::Registry;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("could not read model file: {0}")]
    Unreadable(#[from] std::io::Error),
    #[error("model file contains no geometry")]
    NoGeometry,
}

/// Completion of one body's asset resolution.
pub struct ResolvedAsset {
    pub body: String,
    pub result: Result<PathBuf, AssetError>,
}

/// Starts one resolver thread per registry body and hands back the channel
/// their completions arrive on. Call once; a second resolver for the same
/// registry would duplicate every body in the scene.
pub fn spawn_resolver(registry: &Registry) -> Receiver<ResolvedAsset> {
    let (tx, rx) = channel();
    for body in registry.bodies() {
        let name = body.name.clone();
        let path = PathBuf::from(&body.asset);
        let tx = Sender::clone(&tx);
        thread::spawn(move || {
            let result = resolve(&path);
            // A closed receiver means the window is already gone.
            let _ = tx.send(ResolvedAsset { body: name, result });
        });
    }
    rx
}

fn resolve(path: &Path) -> Result<PathBuf, AssetError> {
    let source = fs::read_to_string(path)?;
    if !source.lines().any(|line| line.starts_with("v ")) {
        return Err(AssetError::NoGeometry);
    }
    Ok(path.to_owned())
}

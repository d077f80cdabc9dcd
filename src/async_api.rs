//! Async-friendly conversion entry point backed by a worker thread
//!
//! The renderer interaction is synchronous, so the blocking pipeline runs on
//! a dedicated thread and the result comes back over a oneshot channel. This
//! keeps async executors responsive without making the engine calls
//! themselves async.

use crate::{ConvertOptions, Error, Result};
use std::path::PathBuf;
use std::thread;
use tokio::sync::oneshot;

/// Create PNG files from an SVG file without blocking the async caller
///
/// Semantics are identical to [`crate::svg2png`]; only the call shape
/// differs.
pub async fn svg2png(options: ConvertOptions) -> Result<Vec<PathBuf>> {
    let (tx, rx) = oneshot::channel();

    thread::spawn(move || {
        let _ = tx.send(crate::svg2png(options));
    });

    rx.await
        .map_err(|e| Error::EngineError(format!("Conversion worker canceled: {}", e)))?
}

//! Time-bounded insight call.
//!
//! The generator runs on its own thread and the caller waits on a channel
//! with `recv_timeout`. A generator that outlives the timeout keeps running
//! detached; its late answer is dropped with the channel.

use crate::insight::{InsightError, InsightGenerator, InsightRequest};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub(crate) fn generate_with_timeout(
    generator: Arc<dyn InsightGenerator>,
    request: InsightRequest,
    timeout: Duration,
) -> Result<String, InsightError> {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("insight".to_string())
        .spawn(move || {
            let _ = tx.send(generator.generate(&request));
        });
    if let Err(e) = spawned {
        return Err(InsightError::Other(format!("could not start insight worker: {e}")));
    }
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(InsightError::Timeout(timeout)),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err(InsightError::Other("insight worker stopped without answering".to_string()))
        }
    }
}

use std::future::Future;

use tokio::sync::Mutex;
use tokio::task::{self, JoinHandle};
use tokio::time::{sleep, Duration};

/// Trailing-edge coalescer: each call cancels the previously scheduled work,
/// so only the last call of a burst runs, `delay` after the burst ends.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub async fn call<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().await;

        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let delay = self.delay;
        *pending = Some(task::spawn(async move {
            sleep(delay).await;
            work.await;
        }));
    }
}

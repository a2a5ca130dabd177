//! Time-bounded generation.
//!
//! [`Deadline`] runs each call of the wrapped service on a worker thread and
//! stops waiting once the bound elapses. The worker is abandoned, not
//! cancelled; its late result is dropped.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::error::{GenerationError, GenerationResult};
use crate::service::{Purpose, TextService};

/// Wraps a service so every call fails with [`GenerationError::Timeout`]
/// after a fixed bound.
#[derive(Debug)]
pub struct Deadline<S> {
    inner: Arc<S>,
    timeout: Duration,
}

impl<S> Deadline<S> {
    /// Bound every call to `inner` by `timeout`.
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }

    /// The bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<S> TextService for Deadline<S>
where
    S: TextService + Send + Sync + 'static,
{
    fn generate(&self, purpose: Purpose, prompt: &str) -> GenerationResult<String> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let prompt = prompt.to_string();

        thread::Builder::new()
            .name("tm-generate".to_string())
            .spawn(move || {
                // receiver may be gone after a timeout
                let _ = tx.send(inner.generate(purpose, &prompt));
            })
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(?purpose, timeout = ?self.timeout, "generation call timed out");
                Err(GenerationError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(GenerationError::Transport(
                "generation worker exited without a result".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sleepy(Duration);

    impl TextService for Sleepy {
        fn generate(&self, _purpose: Purpose, prompt: &str) -> GenerationResult<String> {
            thread::sleep(self.0);
            Ok(format!("echo: {prompt}"))
        }
    }

    struct Panicky;

    impl TextService for Panicky {
        fn generate(&self, _purpose: Purpose, _prompt: &str) -> GenerationResult<String> {
            panic!("boom")
        }
    }

    #[test]
    fn fast_call_passes_through() {
        let d = Deadline::new(Sleepy(Duration::ZERO), Duration::from_secs(5));
        assert_eq!(d.generate(Purpose::Command, "ls").unwrap(), "echo: ls");
    }

    #[test]
    fn slow_call_times_out() {
        let d = Deadline::new(Sleepy(Duration::from_millis(500)), Duration::from_millis(20));
        let err = d.generate(Purpose::Command, "ls").unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(t) if t == Duration::from_millis(20)));
    }

    #[test]
    fn worker_panic_is_a_failure() {
        let d = Deadline::new(Panicky, Duration::from_secs(5));
        assert!(matches!(
            d.generate(Purpose::Narrative, "x"),
            Err(GenerationError::Transport(_))
        ));
    }
}

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

struct Running {
    cancellation: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct State {
    running: Option<Running>,
    /// Loop that was asked to stop and may still be finishing its invocation.
    stopping: Option<JoinHandle<()>>,
}

/// Runs a unit of work, waits for it to complete, sleeps for `delay` and starts over, until
/// stopped.
///
/// Invocations never overlap, even across a stop and a restart. A failed invocation is logged
/// and the loop carries on.
pub struct IntervalScheduler {
    delay: Duration,
    state: Mutex<State>,
}

impl IntervalScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_running(&self) -> bool {
        self.state().running.is_some()
    }

    /// Starts the loop. Does nothing if it's already running.
    ///
    /// If a previous loop is still finishing, the first invocation waits for it.
    pub fn start<W, Fut>(&self, work: W)
    where
        W: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = eyre::Result<()>> + Send + 'static,
    {
        let mut state = self.state();
        if state.running.is_some() {
            tracing::trace!("Scheduler is already running");
            return;
        }

        let cancellation = CancellationToken::new();
        let previous = state.stopping.take();
        let handle = tokio::spawn(Self::run(self.delay, work, previous, cancellation.clone()));

        state.running = Some(Running {
            cancellation,
            handle,
        });
    }

    async fn run<W, Fut>(
        delay: Duration,
        work: W,
        previous: Option<JoinHandle<()>>,
        cancellation: CancellationToken,
    ) where
        W: Fn() -> Fut,
        Fut: Future<Output = eyre::Result<()>>,
    {
        if let Some(previous) = previous {
            if let Err(err) = previous.await {
                tracing::error!("Previous scheduler loop terminated abnormally: {}", err);
            }
        }

        loop {
            if cancellation.is_cancelled() {
                break;
            }

            if let Err(err) = work().await {
                tracing::error!("Scheduled work failed: {:#}", err);
            }

            tokio::select! {
                _ = time::sleep(delay) => {},
                _ = cancellation.cancelled() => break,
            }
        }

        tracing::trace!("Scheduler stopped");
    }

    /// Requests the loop to stop. No invocation starts after this returns, one in flight may
    /// still finish. Does nothing if the loop isn't running.
    pub fn stop(&self) {
        let mut state = self.state();

        if let Some(running) = state.running.take() {
            running.cancellation.cancel();
            state.stopping = Some(running.handle);
        }
    }

    /// Stops the loop and waits for the in-flight invocation, if any, to finish.
    pub async fn shutdown(&self) {
        self.stop();
        let stopping = self.state().stopping.take();

        if let Some(handle) = stopping {
            if let Err(err) = handle.await {
                tracing::error!("Scheduler loop terminated abnormally: {}", err);
            }
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_invocations_never_overlap() {
        let scheduler = IntervalScheduler::new(Duration::from_millis(1));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let invocations = Arc::new(AtomicUsize::new(0));

        let (current, max, count) = (in_flight.clone(), max_in_flight.clone(), invocations.clone());
        scheduler.start(move || {
            let (current, max, count) = (current.clone(), max.clone(), count.clone());
            async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now, Ordering::SeqCst);
                time::sleep(Duration::from_millis(5)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                count.fetch_add(1, Ordering::SeqCst);
                Ok::<(), eyre::Report>(())
            }
        });

        time::sleep(Duration::from_millis(100)).await;
        scheduler.shutdown().await;

        assert!(invocations.load(Ordering::SeqCst) > 1);
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_loop() {
        let scheduler = IntervalScheduler::new(Duration::from_millis(1));
        let invocations = Arc::new(AtomicUsize::new(0));

        let count = invocations.clone();
        scheduler.start(move || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(eyre::eyre!("tick failed"))
            }
        });

        time::sleep(Duration::from_millis(50)).await;
        scheduler.shutdown().await;

        assert!(invocations.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_start_twice_and_stop_are_idempotent() {
        let scheduler = IntervalScheduler::new(Duration::from_millis(1));
        scheduler.stop();

        let invocations = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let count = invocations.clone();
            scheduler.start(move || {
                let count = count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), eyre::Report>(())
                }
            });
        }
        assert!(scheduler.is_running());

        scheduler.shutdown().await;
        scheduler.stop();
        assert!(!scheduler.is_running());

        let stopped_at = invocations.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(20)).await;
        assert_eq!(invocations.load(Ordering::SeqCst), stopped_at);
    }

    #[tokio::test]
    async fn test_restart_after_stop_does_not_overlap() {
        let scheduler = IntervalScheduler::new(Duration::from_millis(1));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let invocations = Arc::new(AtomicUsize::new(0));

        let tick = {
            let (current, max, count) =
                (in_flight.clone(), max_in_flight.clone(), invocations.clone());
            move || {
                let (current, max, count) = (current.clone(), max.clone(), count.clone());
                async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    max.fetch_max(now, Ordering::SeqCst);
                    time::sleep(Duration::from_millis(50)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                    count.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), eyre::Report>(())
                }
            }
        };

        scheduler.start(tick.clone());
        time::sleep(Duration::from_millis(10)).await;

        scheduler.stop();
        scheduler.start(tick);
        assert!(scheduler.is_running());

        time::sleep(Duration::from_millis(150)).await;
        scheduler.shutdown().await;

        assert!(invocations.load(Ordering::SeqCst) >= 2);
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }
}

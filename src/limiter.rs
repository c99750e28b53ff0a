use std::future::Future;
use std::sync::Arc;

use tokio::sync::{AcquireError, Semaphore};
use tokio::task::JoinHandle;

/// Bounds how many download tasks run at once. Spawning waits for a
/// permit, and the permit travels into the spawned task so it is held
/// for the task's whole lifetime.
pub struct TaskLimiter {
    permits: Arc<Semaphore>,
}

impl TaskLimiter {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Waits for a free slot, then spawns `future` onto the runtime.
    /// Fails only if the semaphore has been closed, which this type
    /// never does.
    pub async fn spawn<F>(&self, future: F) -> Result<JoinHandle<F::Output>, AcquireError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let permit = Arc::clone(&self.permits).acquire_owned().await?;
        Ok(tokio::spawn(async move {
            let _permit = permit;
            future.await
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    #[tokio::test]
    async fn runs_the_spawned_future() {
        let limiter = TaskLimiter::new(2);
        let handle = limiter.spawn(async { 7 }).await.unwrap();
        assert_eq!(handle.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn never_exceeds_the_limit() {
        let limiter = TaskLimiter::new(2);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            let handle = limiter
                .spawn(async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    sleep(Duration::from_millis(30)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                })
                .await
                .unwrap();
            handles.push(handle);
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn single_permit_serializes_tasks() {
        let limiter = TaskLimiter::new(1);
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..3 {
            let order = Arc::clone(&order);
            let handle = limiter
                .spawn(async move {
                    order.lock().unwrap().push(i);
                    sleep(Duration::from_millis(10)).await;
                })
                .await
                .unwrap();
            handles.push(handle);
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }
}

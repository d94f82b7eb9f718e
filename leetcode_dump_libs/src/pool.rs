use futures::stream::{FuturesUnordered, StreamExt};
use std::{future::Future, sync::Arc};
use thiserror::Error;
use tokio::{
    sync::{AcquireError, OwnedSemaphorePermit, Semaphore},
    task::JoinHandle,
};

pub const DEFAULT_CAPACITY: usize = 8;

type Result<T> = std::result::Result<T, PoolError>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool is closed")]
    Closed(#[from] AcquireError),
}

/// One unit of the pool's concurrency budget. Dropping it returns the permit.
pub type Permit = OwnedSemaphorePermit;

/// Counting-permit gate that bounds the number of concurrently active tasks.
///
/// Cloning the pool shares the same permits.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits not currently held by any task.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Waits until a permit is free. Waiters are not admitted in any guaranteed order.
    pub async fn acquire(&self) -> Result<Permit> {
        let permit = Arc::clone(&self.permits).acquire_owned().await?;
        Ok(permit)
    }

    /// Spawns `task` on the runtime; it starts running only after a permit was acquired.
    ///
    /// The permit lives as long as the task body and is released on every exit path,
    /// including a panic unwinding through the task.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<Result<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let pool = self.clone();
        tokio::spawn(async move {
            let _permit = pool.acquire().await?;
            Ok(task.await)
        })
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Waits for every spawned task and collects the outputs of those that finished.
///
/// A task that panicked or never got a permit is logged and left out; it does not
/// cancel the remaining tasks.
pub async fn join_all<T>(handles: impl IntoIterator<Item = JoinHandle<Result<T>>>) -> Vec<T> {
    let mut tasks: FuturesUnordered<JoinHandle<Result<T>>> = handles.into_iter().collect();
    let mut outputs = Vec::with_capacity(tasks.len());

    while let Some(task) = tasks.next().await {
        match task {
            Ok(Ok(output)) => outputs.push(output),
            Ok(Err(e)) => tracing::error!("worker task was not started: {:?}", e),
            Err(e) => tracing::error!("an error occurred in a worker task: {:?}", e),
        }
    }

    outputs
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{sleep, Duration};

    #[test]
    fn capacity_is_at_least_one() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.capacity(), 1);
        assert_eq!(pool.available(), 1);

        assert_eq!(WorkerPool::default().capacity(), DEFAULT_CAPACITY);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_capacity() {
        let pool = WorkerPool::new(3);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..30)
            .map(|i| {
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                pool.spawn(async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    sleep(Duration::from_millis(5)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    i
                })
            })
            .collect();

        let mut outputs = join_all(handles).await;
        outputs.sort();

        assert_eq!(outputs, (0..30).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
        assert_eq!(active.load(Ordering::SeqCst), 0);
        assert_eq!(pool.available(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn permits_are_released_on_error_and_panic() {
        let pool = WorkerPool::new(2);

        let mut handles = Vec::new();
        for i in 0..10 {
            handles.push(pool.spawn(async move {
                if i % 3 == 0 {
                    panic!("task {} panicked", i);
                }
                if i % 2 == 0 {
                    Err(format!("task {} failed", i))
                } else {
                    Ok(i)
                }
            }));
        }

        let outputs = join_all(handles).await;

        // 0, 3, 6 and 9 panicked; the rest finished either way.
        assert_eq!(outputs.len(), 6);
        assert_eq!(outputs.iter().filter(|output| output.is_err()).count(), 3);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn acquire_blocks_until_release() {
        let pool = WorkerPool::new(1);
        let permit = pool.acquire().await.unwrap();
        assert_eq!(pool.available(), 0);

        let waiter = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.acquire().await.map(|_| ()) })
        };
        sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(permit);
        waiter.await.unwrap().unwrap();
        assert_eq!(pool.available(), 1);
    }
}

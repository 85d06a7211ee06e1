//! Contention demonstration harness
//!
//! Exercises a lock backend with competing workers: every worker loops
//! acquire -> increment -> release against the same key until a shared
//! target count is reached. The counter and per-worker tallies are owned
//! exclusively by a coordinator task; workers talk to it over a channel and
//! get each increment acknowledged through a oneshot reply, so no mutable
//! state is ever shared between tasks.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use cadeado_lock::LockConfig;

use crate::service::lock::{LockBackend, LockFactory};

/// Outcome of a contention run
#[derive(Debug, Clone, Serialize)]
pub struct ContentionReport {
    pub key: String,
    pub target: u64,
    pub final_count: u64,
    pub workers: Vec<WorkerReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerReport {
    pub worker: usize,
    pub increments: u64,
}

struct Increment {
    worker: usize,
    reply: oneshot::Sender<IncrementAck>,
}

#[derive(Clone, Copy)]
struct IncrementAck {
    count: u64,
    done: bool,
}

/// Run `workers` competing tasks against one lock key until the counter
/// reaches `target`.
pub async fn run(
    factory: Arc<LockFactory>,
    backend: LockBackend,
    config: LockConfig,
    key: &str,
    workers: usize,
    target: u64,
) -> anyhow::Result<ContentionReport> {
    let (tx, mut rx) = mpsc::channel::<Increment>(workers.max(1));

    // The coordinator exclusively owns the counter and tallies; it stops
    // counting at the target and keeps acknowledging so late workers learn
    // they are done.
    let coordinator = tokio::spawn(async move {
        let mut count = 0u64;
        let mut tallies = vec![0u64; workers];
        while let Some(message) = rx.recv().await {
            if count < target {
                count += 1;
                tallies[message.worker] += 1;
            }
            let _ = message.reply.send(IncrementAck {
                count,
                done: count >= target,
            });
        }
        (count, tallies)
    });

    let mut handles = Vec::new();
    for worker in 0..workers {
        let tx = tx.clone();
        let lock = factory.create_with(backend, key, config);
        handles.push(tokio::spawn(async move {
            loop {
                match lock.acquire().await {
                    Ok(true) => {}
                    // Busy: someone else holds the key, poll again
                    Ok(false) => continue,
                    Err(e) => {
                        warn!(worker, error = %e, "worker giving up on acquire");
                        break;
                    }
                }

                let (reply_tx, reply_rx) = oneshot::channel();
                let sent = tx
                    .send(Increment {
                        worker,
                        reply: reply_tx,
                    })
                    .await
                    .is_ok();
                let done = if sent {
                    matches!(reply_rx.await, Ok(ack) if ack.done)
                } else {
                    true
                };

                if let Err(e) = lock.release().await {
                    warn!(worker, error = %e, "worker release failed");
                }

                if done {
                    debug!(worker, "worker finished");
                    break;
                }
            }
        }));
    }
    drop(tx);

    for handle in handles {
        handle.await?;
    }
    let (final_count, tallies) = coordinator.await?;

    Ok(ContentionReport {
        key: key.to_string(),
        target,
        final_count,
        workers: tallies
            .into_iter()
            .enumerate()
            .map(|(worker, increments)| WorkerReport { worker, increments })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cadeado_session::SessionMutexService;
    use cadeado_store::MemoryStore;

    use super::*;

    fn test_factory() -> Arc<LockFactory> {
        Arc::new(LockFactory::new(
            Arc::new(MemoryStore::new()),
            Arc::new(SessionMutexService::new()),
            LockBackend::TokenLease,
            LockConfig::new(Duration::from_secs(5), Duration::from_secs(5))
                .with_poll_interval(Duration::from_millis(10)),
        ))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_counter_reaches_target_exactly() {
        let factory = test_factory();
        let config = factory.default_config();

        let report = run(factory, LockBackend::TokenLease, config, "demo", 3, 30)
            .await
            .unwrap();

        assert_eq!(report.final_count, 30);
        let total: u64 = report.workers.iter().map(|w| w.increments).sum();
        assert_eq!(total, 30);
        assert_eq!(report.workers.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_session_backend_run() {
        let factory = test_factory();
        let config = factory.default_config();

        let report = run(factory, LockBackend::Session, config, "demo", 2, 10)
            .await
            .unwrap();

        assert_eq!(report.final_count, 10);
    }

    #[tokio::test]
    async fn test_zero_target_counts_nothing() {
        let factory = test_factory();
        let config = factory.default_config();

        let report = run(factory, LockBackend::TokenLease, config, "demo", 2, 0)
            .await
            .unwrap();

        assert_eq!(report.final_count, 0);
        assert!(report.workers.iter().all(|w| w.increments == 0));
    }
}

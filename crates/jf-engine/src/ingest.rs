//! Ingest worker pool
//!
//! Models the consumer side of the bet topic. Events are routed to a
//! worker by `jackpot_id`, so each jackpot's events stay FIFO on one
//! thread the way the bus partitions them. Delivery is at-least-once:
//! version conflicts re-enqueue the event and the contribution service's
//! `bet_id` idempotency absorbs any duplicate that slips through.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Sender};
use jf_core::BetEvent;
use jf_store::StoreError;

use crate::contribution::ContributionService;
use crate::error::{EngineError, EngineResult};

/// Worker-pool sizing and redelivery limits.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Worker threads, one queue each. Mirrors the topic partition count.
    pub workers: usize,
    /// Delivery attempts per event before it is dropped.
    pub max_attempts: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            max_attempts: 5,
        }
    }
}

enum WorkerMessage {
    Deliver { event: BetEvent, attempt: u32 },
    Shutdown,
}

/// Partitioned worker pool feeding the contribution service.
pub struct IngestPool {
    senders: Vec<Sender<WorkerMessage>>,
    handles: Vec<JoinHandle<()>>,
}

impl IngestPool {
    /// Spawn the workers. `config.workers` must be at least 1.
    pub fn start(service: Arc<ContributionService>, config: IngestConfig) -> Self {
        let workers = config.workers.max(1);
        let mut senders = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for worker_index in 0..workers {
            let (tx, rx) = unbounded::<WorkerMessage>();
            let redeliver = tx.clone();
            let service = service.clone();
            let max_attempts = config.max_attempts.max(1);

            let handle = std::thread::spawn(move || {
                while let Ok(message) = rx.recv() {
                    let (event, attempt) = match message {
                        WorkerMessage::Deliver { event, attempt } => (event, attempt),
                        WorkerMessage::Shutdown => break,
                    };
                    match service.contribute(&event) {
                        Ok(_) => {}
                        Err(EngineError::Store(StoreError::VersionConflict { .. }))
                            if attempt + 1 < max_attempts =>
                        {
                            log::warn!(
                                "worker {worker_index}: version conflict on bet {}, redelivering (attempt {})",
                                event.bet_id,
                                attempt + 1
                            );
                            let _ = redeliver.send(WorkerMessage::Deliver {
                                event,
                                attempt: attempt + 1,
                            });
                        }
                        Err(err) => {
                            log::warn!(
                                "worker {worker_index}: dropping bet {}: {err}",
                                event.bet_id
                            );
                        }
                    }
                }
            });

            senders.push(tx);
            handles.push(handle);
        }

        Self { senders, handles }
    }

    /// Enqueue one bet event on its jackpot's partition.
    pub fn publish(&self, event: BetEvent) -> EngineResult<()> {
        let partition = (event.jackpot_id % self.senders.len() as u64) as usize;
        self.senders[partition]
            .send(WorkerMessage::Deliver { event, attempt: 0 })
            .map_err(|_| EngineError::IngestClosed)
    }

    /// Drain the queues and join the workers. Events enqueued after the
    /// shutdown marker are discarded.
    pub fn shutdown(mut self) {
        for sender in &self.senders {
            let _ = sender.send(WorkerMessage::Shutdown);
        }
        self.senders.clear();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

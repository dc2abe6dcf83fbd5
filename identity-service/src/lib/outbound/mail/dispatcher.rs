use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::MailConfig;
use crate::domain::mail::MailMessage;
use crate::domain::mail::MailQueue;
use crate::domain::mail::Mailer;

/// Bounded in-process mail queue drained by a fixed pool of worker tasks.
///
/// Submitting never waits: when the queue is full the message is dropped and
/// a warning is logged. Delivery failures are logged by the worker and not
/// retried.
#[derive(Clone)]
pub struct MailDispatcher {
    sender: mpsc::Sender<MailMessage>,
}

/// Handles to the worker tasks started with a [`MailDispatcher`].
///
/// Workers exit once every dispatcher clone has been dropped and the queue is empty.
pub struct MailWorkers {
    handles: Vec<JoinHandle<()>>,
}

impl MailDispatcher {
    /// Start the worker pool and return the submitting half.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    /// * `mailer` - Transport used by every worker
    /// * `config` - Worker count and queue capacity
    pub fn start<M>(mailer: Arc<M>, config: &MailConfig) -> (Self, MailWorkers)
    where
        M: Mailer,
    {
        let capacity = config.queue_capacity.max(1);
        let workers = config.workers.max(1);

        let (sender, receiver) = mpsc::channel(capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let handles = (0..workers)
            .map(|worker| {
                let mailer = Arc::clone(&mailer);
                let receiver = Arc::clone(&receiver);
                tokio::spawn(async move { run_worker(worker, mailer, receiver).await })
            })
            .collect();

        tracing::info!(workers, capacity, "Mail dispatcher started");

        (Self { sender }, MailWorkers { handles })
    }
}

impl MailQueue for MailDispatcher {
    fn submit(&self, message: MailMessage) {
        match self.sender.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => {
                tracing::warn!(
                    recipients = message.to.len(),
                    subject = %message.subject,
                    "Mail queue full, dropping message"
                );
            }
            Err(TrySendError::Closed(message)) => {
                tracing::error!(
                    recipients = message.to.len(),
                    subject = %message.subject,
                    "Mail workers stopped, dropping message"
                );
            }
        }
    }
}

impl MailWorkers {
    /// Wait for every worker to drain the queue and exit.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Mail worker panicked");
            }
        }
    }
}

async fn run_worker<M>(
    worker: usize,
    mailer: Arc<M>,
    receiver: Arc<Mutex<mpsc::Receiver<MailMessage>>>,
) where
    M: Mailer,
{
    loop {
        // Lock is held only while waiting for the next message.
        let next = receiver.lock().await.recv().await;
        let Some(message) = next else {
            break;
        };

        match mailer.send(&message).await {
            Ok(()) => tracing::debug!(worker, subject = %message.subject, "Mail delivered"),
            Err(e) => tracing::error!(
                worker,
                subject = %message.subject,
                error = %e,
                "Mail delivery failed"
            ),
        }
    }

    tracing::debug!(worker, "Mail worker stopped");
}

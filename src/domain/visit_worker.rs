//! Asynchronous visit recording.
//!
//! Redirect handlers hand visits to an [`AnalyticsRecorder`], which only enqueues
//! them. [`run_visit_worker`] drains the queue in the background and performs the
//! two store writes for every visit. Nothing here can fail or slow down a redirect.

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use tokio::sync::{Semaphore, mpsc, mpsc::error::TrySendError};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{NewVisit, VisitMetadata};
use crate::domain::repositories::LinkRepository;

/// Handle used on the redirect path to report visits.
///
/// Cloning is cheap; all clones feed the same worker and share one overflow budget.
#[derive(Clone)]
pub struct AnalyticsRecorder {
    sender: mpsc::Sender<NewVisit>,
    overflow: Arc<Semaphore>,
    overflow_limit: usize,
}

impl AnalyticsRecorder {
    /// Wraps `sender`, allowing up to `overflow_limit` visits to wait for queue
    /// space at once.
    pub fn new(sender: mpsc::Sender<NewVisit>, overflow_limit: usize) -> Self {
        Self {
            sender,
            overflow: Arc::new(Semaphore::new(overflow_limit)),
            overflow_limit,
        }
    }

    /// Creates a recorder and the receiving end for [`run_visit_worker`].
    ///
    /// The overflow budget equals the queue capacity.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<NewVisit>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender, capacity), receiver)
    }

    /// Reports a visit to `code`. Returns immediately.
    ///
    /// When the queue is full the visit is handed to a spawned task that waits for
    /// space, as long as an overflow permit is free. Once the overflow budget is
    /// spent the visit is dropped and counted. Must be called from within a Tokio
    /// runtime.
    pub fn record(&self, code: &str, metadata: VisitMetadata) {
        let visit = NewVisit::new(code, Utc::now(), metadata);

        match self.sender.try_send(visit) {
            Ok(()) => {}
            Err(TrySendError::Full(visit)) => {
                counter!("snaplink_visit_queue_full_total").increment(1);

                let Ok(permit) = Arc::clone(&self.overflow).try_acquire_owned() else {
                    counter!("snaplink_visits_dropped_total").increment(1);
                    warn!(code = %visit.link_code, "visit queue overloaded, visit dropped");
                    return;
                };

                debug!(code = %visit.link_code, "visit queue full, deferring enqueue");

                let sender = self.sender.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    if let Err(err) = sender.send(visit).await {
                        counter!("snaplink_visits_dropped_total").increment(1);
                        warn!(code = %err.0.link_code, "visit queue closed, visit dropped");
                    }
                });
            }
            Err(TrySendError::Closed(visit)) => {
                counter!("snaplink_visits_dropped_total").increment(1);
                warn!(code = %visit.link_code, "visit queue closed, visit dropped");
            }
        }
    }

    /// Visits currently parked waiting for queue space.
    pub fn deferred(&self) -> usize {
        self.overflow_limit - self.overflow.available_permits()
    }

    /// Returns true once the worker has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots currently left in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}

/// Drains the visit queue until every sender is dropped.
///
/// Up to `concurrency` visits are written at once. Pending writes are awaited
/// before the function returns, so awaiting the worker's join handle after the
/// last [`AnalyticsRecorder`] is dropped flushes all queued visits.
pub async fn run_visit_worker<R>(
    mut receiver: mpsc::Receiver<NewVisit>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: LinkRepository + ?Sized + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    info!(concurrency, "Visit worker started");

    while let Some(visit) = receiver.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let repository = Arc::clone(&repository);
        tasks.spawn(async move {
            let _permit = permit;
            process_visit(repository.as_ref(), visit).await;
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}

    info!("Visit worker stopped");
}

/// Performs both writes for one visit, each exactly once.
///
/// The visit row and the counter are independent; a failure of one does not
/// prevent the other.
pub async fn process_visit<R>(repository: &R, visit: NewVisit)
where
    R: LinkRepository + ?Sized,
{
    let code = visit.link_code.clone();

    let (recorded, incremented) = tokio::join!(
        repository.record_visit(visit),
        repository.increment_click_count(&code),
    );

    match recorded {
        Ok(()) => counter!("snaplink_visits_recorded_total").increment(1),
        Err(err) => {
            counter!("snaplink_visit_write_failures_total", "operation" => "record_visit")
                .increment(1);
            error!(code = %code, error = %err, "failed to record visit");
        }
    }

    if let Err(err) = incremented {
        counter!("snaplink_visit_write_failures_total", "operation" => "increment_click_count")
            .increment(1);
        error!(code = %code, error = %err, "failed to increment click count");
    }
}

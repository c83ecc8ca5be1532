//! Handler running asynchronous work on the tokio runtime.

use crate::macros::log_warn;
use relay_core::{BoxError, Event, EventHandle, Handler};
use std::{future::Future, time::Duration};
use thiserror::Error;
use tokio::{runtime::Handle, time::timeout};

/// Error reported when the work of an [`AsyncHandler`] times out.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("async handler timed out after {0:?}")]
pub struct TimeoutError(pub Duration);

/// A handler that holds the dispatch while a future runs.
///
/// The future is spawned on the current tokio runtime and the dispatch is
/// resumed when it finishes, fails, or exceeds the optional timeout.
///
/// # Example
///
/// ```rust,ignore
/// let lookup = AsyncHandler::new(|event: EventHandle<PlayerJoin>| async move {
///     let rank = db.rank_of(&event.name).await?;
///     event.set_rank(rank);
///     Ok(())
/// })
/// .with_timeout(Duration::from_secs(2));
/// ```
pub struct AsyncHandler<F> {
    work: F,
    limit: Option<Duration>,
}

impl<F> AsyncHandler<F> {
    /// Create a handler running `work` for every event.
    pub fn new(work: F) -> Self {
        Self { work, limit: None }
    }

    /// Release the hold after `limit` even if the work has not finished.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl<E, F, Fut> Handler<E> for AsyncHandler<F>
where
    E: Event,
    F: Fn(EventHandle<E>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    fn handle(&self, event: &EventHandle<E>) -> Result<(), BoxError> {
        let runtime = Handle::try_current()?;
        let guard = event.hold_guard()?;
        let work = (self.work)(event.clone());
        let limit = self.limit;
        let name = event.event_name();

        runtime.spawn(async move {
            let outcome = match limit {
                Some(limit) => match timeout(limit, work).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(Box::new(TimeoutError(limit)) as BoxError),
                },
                None => work.await,
            };
            if let Err(err) = outcome {
                log_warn!(event = name, error = %err, "async handler failed");
                #[cfg(not(feature = "tracing"))]
                let _ = (name, err);
            }
            drop(guard);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Phase, PrioritizedEvent, SequentialEvent,
        registry::RegistryBuilder,
        testing::{Journal, RecordingHandler},
    };
    use std::sync::Arc;

    #[derive(Debug)]
    struct Lookup;
    impl Event for Lookup {}

    #[tokio::test]
    async fn resumes_after_the_future_finishes() {
        let journal = Journal::new();
        let slow = {
            let journal = journal.clone();
            AsyncHandler::new(move |_event: EventHandle<Lookup>| {
                let journal = journal.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    journal.push("slow done");
                    Ok::<(), BoxError>(())
                }
            })
        };
        let registry = RegistryBuilder::<Lookup>::new()
            .register(slow)
            .register(RecordingHandler::new("after", &journal))
            .build();

        let event = SequentialEvent::new(Lookup, Arc::new(registry));
        let completion = event.dispatch().unwrap();
        assert_eq!(event.phase(), Phase::Blocked);
        assert!(journal.is_empty());

        completion.await.unwrap();
        assert_eq!(journal.entries(), ["slow done", "after"]);
    }

    #[tokio::test]
    async fn timeout_releases_the_hold() {
        let journal = Journal::new();
        let stalled = AsyncHandler::new(|_event: EventHandle<Lookup>| async {
            std::future::pending::<()>().await;
            Ok::<(), BoxError>(())
        })
        .with_timeout(Duration::from_millis(10));
        let registry = RegistryBuilder::<Lookup>::new()
            .register_with_priority(stalled, -1)
            .register(RecordingHandler::new("next tier", &journal))
            .build();

        let event = PrioritizedEvent::new(Lookup, Arc::new(registry));
        event.dispatch().unwrap().await.unwrap();
        assert_eq!(journal.entries(), ["next tier"]);
    }

    #[test]
    fn outside_a_runtime_the_handler_fails_without_holding() {
        let journal = Journal::new();
        let handler = AsyncHandler::new(|_event: EventHandle<Lookup>| async { Ok::<(), BoxError>(()) });
        let registry = RegistryBuilder::<Lookup>::new()
            .register(handler)
            .register(RecordingHandler::new("still runs", &journal))
            .build();

        let event = SequentialEvent::new(Lookup, Arc::new(registry));
        event.call().unwrap();
        assert!(event.is_completed());
        assert_eq!(journal.entries(), ["still runs"]);
    }
}

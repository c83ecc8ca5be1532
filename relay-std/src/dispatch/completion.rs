//! Awaitable completion of a dispatch.

use futures::{FutureExt, channel::oneshot};
use relay_core::DispatchError;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

pub(crate) type Waiter = oneshot::Sender<Result<(), DispatchError>>;

/// Resolves once a dispatch finished every handler.
///
/// Resolves to [`DispatchError::StuckPipeline`] when the owner is torn down
/// while the dispatch is unfinished, and to [`DispatchError::Abandoned`] when
/// it is dropped before the dispatch started.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Completion {
    receiver: oneshot::Receiver<Result<(), DispatchError>>,
    event: &'static str,
}

impl Completion {
    pub(crate) fn channel(event: &'static str) -> (Waiter, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self { receiver, event })
    }
}

impl Future for Completion {
    type Output = Result<(), DispatchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let event = self.event;
        self.receiver.poll_unpin(cx).map(|received| match received {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Err(DispatchError::Abandoned { event }),
        })
    }
}

//! # Dispatch state machine
//!
//! [`AsyncEvent`] delivers one event to its handlers while letting any handler
//! put the delivery on hold until asynchronous work finishes.
//!
//! ```text
//! NotStarted --call()--> Running --hold()--> Blocked --resume()--> Running ... --> Completed
//! ```
//!
//! The handler list is looked up once, when the dispatch starts, and cut into
//! steps by the [`Policy`]. The engine invokes the current step; if nothing
//! holds it afterwards it advances, otherwise it returns to the caller and
//! waits for the matching `resume()`. When the steps run out the completion
//! callback fires and pending [`Completion`] futures resolve.
//!
//! # Threading
//!
//! State changes are serialized by a mutex that is never held while user code
//! runs. Only one call stack drives the loop at a time: a `resume()` that
//! arrives while handlers are being invoked (from inside a handler, or from
//! another thread) only releases its hold and the running loop picks it up.
//!
//! # Teardown
//!
//! A dispatch that started but never finished is a bug in some handler that
//! forgot to resume. Tearing down the [`AsyncEvent`] owner, through
//! [`AsyncEvent::close`] or by dropping it, reports the dispatch as
//! [`DispatchError::StuckPipeline`] and abandons it: the handler snapshot is
//! released, pending [`Completion`]s fail, and handles still held by
//! handlers get [`DispatchError::Abandoned`] from then on. `close` returns
//! the error; a drop applies the configured [`StuckPolicy`].

mod completion;
mod policy;

pub use completion::Completion;
pub use policy::{Batch, HoldViolation, Policy, Prioritized, Reentrant, Strict};

use crate::{
    callback::CallbackHolder,
    config::{DispatchConfig, StuckPolicy},
    cursor::HandlerCursor,
    macros::{log_debug, log_error, log_trace, log_warn},
};
use completion::Waiter;
use relay_core::{DispatchError, Event, EventHandle, HandlerProvider, Occurrence, RelayError};
use std::{
    fmt,
    marker::PhantomData,
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

/// Strictly sequential dispatch.
pub type SequentialEvent<E> = AsyncEvent<E, Strict>;
/// Sequential dispatch tolerating repeated and unmatched holds/resumes.
pub type ReentrantEvent<E> = AsyncEvent<E, Reentrant>;
/// Tier-by-tier dispatch.
pub type PrioritizedEvent<E> = AsyncEvent<E, Prioritized>;

/// Observable lifecycle of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `call()` has not been invoked.
    NotStarted,
    /// Handlers are being invoked.
    Running,
    /// Waiting for outstanding holds to be resumed.
    Blocked,
    /// Every handler ran and the callback fired.
    Completed,
    /// The owner was torn down before every handler ran.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    NotStarted,
    Running,
    Completed,
    Abandoned,
}

struct State<E: Event> {
    stage: Stage,
    // Consumed by `start`.
    provider: Option<Arc<dyn HandlerProvider<E>>>,
    cursor: HandlerCursor<Batch<E>>,
    holds: u32,
    // Set while some call stack is inside `run`.
    driving: bool,
    callback: CallbackHolder<E>,
    waiters: Vec<Waiter>,
}

impl<E: Event> State<E> {
    fn new(provider: Arc<dyn HandlerProvider<E>>) -> Self {
        Self {
            stage: Stage::NotStarted,
            provider: Some(provider),
            cursor: HandlerCursor::default(),
            holds: 0,
            driving: false,
            callback: CallbackHolder::new(),
            waiters: Vec::new(),
        }
    }

    fn stalled_owners(&self) -> Vec<String> {
        self.cursor
            .current()
            .map(|batch| batch.iter().map(|r| r.owner().to_owned()).collect())
            .unwrap_or_default()
    }
}

struct Shared<E: Event, P: Policy> {
    this: Weak<Self>,
    event: E,
    name: &'static str,
    config: DispatchConfig,
    state: Mutex<State<E>>,
    _policy: PhantomData<fn() -> P>,
}

/// Clears the driving flag when a handler unwinds out of the loop, so a later
/// `resume()` can drive again.
struct Unwind<'a, E: Event, P: Policy>(&'a Shared<E, P>);

impl<E: Event, P: Policy> Drop for Unwind<'_, E, P> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.lock().driving = false;
        }
    }
}

impl<E: Event, P: Policy> Shared<E, P> {
    fn lock(&self) -> MutexGuard<'_, State<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stuck(&self, state: &State<E>) -> DispatchError {
        DispatchError::StuckPipeline {
            event: self.name,
            owners: state.stalled_owners(),
        }
    }

    fn start(&self) -> Result<(), DispatchError> {
        let mut state = self.lock();
        if state.stage != Stage::NotStarted {
            return Err(DispatchError::AlreadyStarted { event: self.name });
        }
        state.stage = Stage::Running;
        state.driving = true;
        let provider = state.provider.take();
        drop(state);

        let steps = match provider {
            Some(provider) => {
                let _unwind = Unwind(self);
                P::plan(&*provider, &self.event).unwrap_or_else(|err| {
                    log_warn!(
                        event = self.name,
                        error = %err,
                        "handler lookup failed, dispatching to no handlers"
                    );
                    #[cfg(not(feature = "tracing"))]
                    let _ = err;
                    Vec::new()
                })
            }
            None => Vec::new(),
        };
        log_debug!(
            event = self.name,
            policy = P::NAME,
            steps = steps.len(),
            "dispatch started"
        );

        let mut state = self.lock();
        state.cursor = HandlerCursor::new(steps);
        state.cursor.advance();
        self.run(state);
        Ok(())
    }

    /// Invokes steps until one is left on hold or the cursor runs out.
    ///
    /// Entered with `driving` set and the cursor on a step not yet invoked.
    fn run<'a>(&'a self, mut state: MutexGuard<'a, State<E>>) {
        loop {
            let Some(batch) = state.cursor.current().cloned() else {
                return self.complete(state);
            };
            drop(state);
            self.invoke(&batch);

            state = self.lock();
            // Abandoned by the owner while a handler ran on another thread.
            if state.stage != Stage::Running {
                state.driving = false;
                return;
            }
            if state.holds > 0 {
                log_trace!(event = self.name, holds = state.holds, "dispatch on hold");
                state.driving = false;
                return;
            }
            state.cursor.advance();
        }
    }

    fn invoke(&self, batch: &Batch<E>) {
        let Some(this) = self.this.upgrade() else {
            return;
        };
        let handle = EventHandle::new(this);
        let _unwind = Unwind(self);
        for registration in batch.iter() {
            log_trace!(
                event = self.name,
                owner = registration.owner(),
                "invoking handler"
            );
            if let Err(source) = registration.handler().handle(&handle) {
                let failure = RelayError::Handler {
                    owner: registration.owner().to_owned(),
                    source,
                };
                log_warn!(event = self.name, error = %failure, "handler failed");
                #[cfg(not(feature = "tracing"))]
                let _ = failure;
            }
        }
    }

    /// Abandons a running dispatch, returning the stuck-pipeline error.
    ///
    /// Releases the handler snapshot and the callback outside the lock, so
    /// handlers that kept an [`EventHandle`] no longer keep this alive.
    fn abandon(&self) -> Option<DispatchError> {
        let mut state = self.lock();
        if state.stage != Stage::Running {
            return None;
        }
        let err = self.stuck(&state);
        state.stage = Stage::Abandoned;
        state.holds = 0;
        let cursor = mem::take(&mut state.cursor);
        let callback = state.callback.take();
        let waiters = mem::take(&mut state.waiters);
        drop(state);

        for waiter in waiters {
            let _ = waiter.send(Err(err.clone()));
        }
        drop((cursor, callback));
        Some(err)
    }

    fn complete(&self, mut state: MutexGuard<'_, State<E>>) {
        state.stage = Stage::Completed;
        state.driving = false;
        let callback = state.callback.take();
        let waiters = mem::take(&mut state.waiters);
        drop(state);

        log_debug!(event = self.name, "dispatch completed");
        if let Some(callback) = callback {
            callback(&self.event);
        }
        for waiter in waiters {
            let _ = waiter.send(Ok(()));
        }
    }
}

impl<E: Event, P: Policy> Occurrence<E> for Shared<E, P> {
    fn event(&self) -> &E {
        &self.event
    }

    fn event_name(&self) -> &'static str {
        self.name
    }

    fn hold(&self) -> Result<(), DispatchError> {
        let mut state = self.lock();
        match state.stage {
            Stage::NotStarted => return Err(DispatchError::NotStarted { event: self.name }),
            Stage::Completed => return Err(DispatchError::Completed { event: self.name }),
            Stage::Abandoned => return Err(DispatchError::Abandoned { event: self.name }),
            Stage::Running => {}
        }
        P::hold(&mut state.holds).map_err(|violation| violation.into_error(self.name))?;
        log_trace!(event = self.name, holds = state.holds, "hold");
        Ok(())
    }

    fn resume(&self) -> Result<(), DispatchError> {
        let mut state = self.lock();
        match state.stage {
            Stage::NotStarted => return Err(DispatchError::NotStarted { event: self.name }),
            Stage::Abandoned => return Err(DispatchError::Abandoned { event: self.name }),
            Stage::Running | Stage::Completed => {}
        }
        P::release(&mut state.holds).map_err(|violation| violation.into_error(self.name))?;
        log_trace!(event = self.name, holds = state.holds, "resume");

        if state.stage == Stage::Running && state.holds == 0 && !state.driving {
            state.driving = true;
            state.cursor.advance();
            self.run(state);
        }
        Ok(())
    }
}

/// An event occurrence being dispatched to its handlers.
///
/// The owner-side handle: starts the dispatch, attaches the completion
/// callback and tears the dispatch down. Handlers receive an [`EventHandle`]
/// pointing at the same occurrence.
///
/// # Example
/// ```ignore
/// let event = SequentialEvent::new(PlayerJoin::new("steve"), registry.clone());
/// event.set_callback(|join| println!("{} joined", join.name))?;
/// event.call()?;
/// ```
pub struct AsyncEvent<E: Event, P: Policy> {
    shared: Arc<Shared<E, P>>,
}

impl<E: Event, P: Policy> AsyncEvent<E, P> {
    /// Create a dispatch with the default configuration.
    ///
    /// The provider is not consulted until [`call`](Self::call).
    pub fn new<R>(event: E, provider: Arc<R>) -> Self
    where
        R: HandlerProvider<E> + 'static,
    {
        Self::with_config(event, provider, DispatchConfig::default())
    }

    /// Create a dispatch with the given configuration.
    pub fn with_config<R>(event: E, provider: Arc<R>, config: DispatchConfig) -> Self
    where
        R: HandlerProvider<E> + 'static,
    {
        let name = config.label().unwrap_or_else(|| event.event_name());
        let provider: Arc<dyn HandlerProvider<E>> = provider;
        let shared = Arc::new_cyclic(|this| Shared {
            this: this.clone(),
            event,
            name,
            config,
            state: Mutex::new(State::new(provider)),
            _policy: PhantomData,
        });
        Self { shared }
    }

    /// The event payload.
    pub fn event(&self) -> &E {
        &self.shared.event
    }

    /// Name of the event used in diagnostics.
    pub fn event_name(&self) -> &'static str {
        self.shared.name
    }

    /// A handler-side handle to this dispatch.
    pub fn handle(&self) -> EventHandle<E> {
        EventHandle::new(self.shared.clone())
    }

    /// Set the completion callback, replacing a previous one.
    ///
    /// Fails with [`DispatchError::Completed`] once the dispatch finished; the
    /// callback is dropped without running.
    pub fn set_callback<F>(&self, callback: F) -> Result<(), DispatchError>
    where
        F: FnOnce(&E) + Send + 'static,
    {
        let event = self.shared.name;
        let mut state = self.shared.lock();
        if state.stage == Stage::Abandoned {
            return Err(DispatchError::Abandoned { event });
        }
        state
            .callback
            .set(Box::new(callback))
            .map_err(|_| DispatchError::Completed { event })
    }

    /// Start the dispatch.
    ///
    /// Returns once every handler ran or a handler left the dispatch on hold.
    pub fn call(&self) -> Result<(), DispatchError> {
        self.shared.start()
    }

    /// Hold the dispatch at its current step.
    #[doc(alias = "block")]
    pub fn hold(&self) -> Result<(), DispatchError> {
        self.shared.hold()
    }

    /// Release a hold; the dispatch continues once no hold is outstanding.
    #[doc(alias = "release")]
    pub fn resume(&self) -> Result<(), DispatchError> {
        self.shared.resume()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        let state = self.shared.lock();
        match state.stage {
            Stage::NotStarted => Phase::NotStarted,
            Stage::Completed => Phase::Completed,
            Stage::Abandoned => Phase::Abandoned,
            Stage::Running if state.holds > 0 && !state.driving => Phase::Blocked,
            Stage::Running => Phase::Running,
        }
    }

    /// Whether every handler ran.
    pub fn is_completed(&self) -> bool {
        self.phase() == Phase::Completed
    }

    /// Number of holds not yet resumed.
    pub fn pending_holds(&self) -> u32 {
        self.shared.lock().holds
    }

    /// A future resolving when the dispatch completes.
    pub fn completion(&self) -> Completion {
        let (waiter, completion) = Completion::channel(self.shared.name);
        let mut state = self.shared.lock();
        match state.stage {
            Stage::Completed => {
                let _ = waiter.send(Ok(()));
            }
            Stage::Abandoned => {
                let _ = waiter.send(Err(DispatchError::Abandoned {
                    event: self.shared.name,
                }));
            }
            Stage::NotStarted | Stage::Running => state.waiters.push(waiter),
        }
        completion
    }

    /// Start the dispatch and return its completion.
    pub fn dispatch(&self) -> Result<Completion, DispatchError> {
        let completion = self.completion();
        self.call()?;
        Ok(completion)
    }

    /// Tear down this handle, reporting an unfinished dispatch.
    ///
    /// An unfinished dispatch is abandoned: handles given to handlers stay
    /// valid but their `hold()`/`resume()` fail with
    /// [`DispatchError::Abandoned`].
    pub fn close(self) -> Result<(), DispatchError> {
        match self.shared.abandon() {
            Some(err) => {
                log_error!(event = self.shared.name, error = %err, "dispatch closed before finishing");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

impl<E: Event, P: Policy> Drop for AsyncEvent<E, P> {
    fn drop(&mut self) {
        let Some(err) = self.shared.abandon() else {
            return;
        };
        match self.shared.config.stuck_policy() {
            StuckPolicy::Panic if !std::thread::panicking() => panic!("{err}"),
            StuckPolicy::Panic | StuckPolicy::Log => {
                log_error!(event = self.shared.name, error = %err, "dispatch dropped before finishing");
                #[cfg(not(feature = "tracing"))]
                let _ = err;
            }
        }
    }
}

impl<E: Event, P: Policy> fmt::Debug for AsyncEvent<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncEvent")
            .field("event", &self.shared.name)
            .field("policy", &P::NAME)
            .field("phase", &self.phase())
            .finish()
    }
}

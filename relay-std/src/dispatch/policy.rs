//! Dispatch policies.
//!
//! A policy decides two things: how the provider's registrations are cut into
//! steps (one handler per step, or one priority tier per step) and how
//! `hold`/`resume` calls change the hold count.

use relay_core::{BoxError, DispatchError, Event, HandlerProvider, Registration};
use std::sync::Arc;

/// The registrations invoked together as one step of a dispatch.
pub type Batch<E> = Arc<[Registration<E>]>;

/// A hold or resume that the policy refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldViolation {
    /// `hold()` while already held, on a policy allowing a single hold.
    AlreadyHeld,
    /// `resume()` without an outstanding hold.
    NotHeld,
}

impl HoldViolation {
    /// Attach the event name.
    pub fn into_error(self, event: &'static str) -> DispatchError {
        match self {
            HoldViolation::AlreadyHeld => DispatchError::AlreadyHeld { event },
            HoldViolation::NotHeld => DispatchError::InvalidResume { event },
        }
    }
}

/// Strategy for stepping through handlers and counting holds.
///
/// This abstraction allows different execution models to share the one
/// dispatch state machine in [`AsyncEvent`](super::AsyncEvent).
pub trait Policy: Send + Sync + 'static {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Cut the provider's registrations into steps.
    fn plan<E: Event>(
        provider: &dyn HandlerProvider<E>,
        event: &E,
    ) -> Result<Vec<Batch<E>>, BoxError>;

    /// Apply a `hold()` to the hold count.
    fn hold(holds: &mut u32) -> Result<(), HoldViolation>;

    /// Apply a `resume()` to the hold count.
    fn release(holds: &mut u32) -> Result<(), HoldViolation>;
}

fn one_per_step<E: Event>(registrations: Vec<Registration<E>>) -> Vec<Batch<E>> {
    registrations
        .into_iter()
        .map(|registration| Arc::from(vec![registration]))
        .collect()
}

/// One handler at a time; every hold must be matched by exactly one resume.
#[derive(Debug, Default, Clone, Copy)]
pub struct Strict;

impl Policy for Strict {
    const NAME: &'static str = "strict";

    fn plan<E: Event>(
        provider: &dyn HandlerProvider<E>,
        event: &E,
    ) -> Result<Vec<Batch<E>>, BoxError> {
        Ok(one_per_step(provider.handlers_for(event)?))
    }

    fn hold(holds: &mut u32) -> Result<(), HoldViolation> {
        if *holds > 0 {
            return Err(HoldViolation::AlreadyHeld);
        }
        *holds = 1;
        Ok(())
    }

    fn release(holds: &mut u32) -> Result<(), HoldViolation> {
        if *holds == 0 {
            return Err(HoldViolation::NotHeld);
        }
        *holds = 0;
        Ok(())
    }
}

/// One handler at a time; holding is idempotent and a resume never requires
/// a prior hold.
#[derive(Debug, Default, Clone, Copy)]
pub struct Reentrant;

impl Policy for Reentrant {
    const NAME: &'static str = "reentrant";

    fn plan<E: Event>(
        provider: &dyn HandlerProvider<E>,
        event: &E,
    ) -> Result<Vec<Batch<E>>, BoxError> {
        Ok(one_per_step(provider.handlers_for(event)?))
    }

    fn hold(holds: &mut u32) -> Result<(), HoldViolation> {
        *holds = 1;
        Ok(())
    }

    fn release(holds: &mut u32) -> Result<(), HoldViolation> {
        *holds = 0;
        Ok(())
    }
}

/// A whole priority tier per step; the tier is done once every hold raised
/// in it was resumed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Prioritized;

impl Policy for Prioritized {
    const NAME: &'static str = "prioritized";

    fn plan<E: Event>(
        provider: &dyn HandlerProvider<E>,
        event: &E,
    ) -> Result<Vec<Batch<E>>, BoxError> {
        Ok(provider
            .tiers_for(event)?
            .into_iter()
            .filter(|tier| !tier.registrations.is_empty())
            .map(|tier| Arc::from(tier.registrations))
            .collect())
    }

    fn hold(holds: &mut u32) -> Result<(), HoldViolation> {
        *holds += 1;
        Ok(())
    }

    fn release(holds: &mut u32) -> Result<(), HoldViolation> {
        if *holds == 0 {
            return Err(HoldViolation::NotHeld);
        }
        *holds -= 1;
        Ok(())
    }
}

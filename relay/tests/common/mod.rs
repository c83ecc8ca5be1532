#![allow(dead_code)]

use relay::{BoxError, Event, EventHandle, Handler};
use std::sync::{Arc, Mutex};

// ============================================================================
// Test Event Types
// ============================================================================

/// A player joining a server; handlers fill in the rank asynchronously.
#[derive(Debug)]
pub struct PlayerJoin {
    pub name: String,
    pub rank: Mutex<Option<String>>,
}

impl PlayerJoin {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            rank: Mutex::new(None),
        }
    }

    pub fn rank(&self) -> Option<String> {
        self.rank.lock().unwrap().clone()
    }
}

impl Event for PlayerJoin {
    fn event_name(&self) -> &'static str {
        "PlayerJoin"
    }
}

// ============================================================================
// Simulated Remote Service
// ============================================================================

type Job = Box<dyn FnOnce() + Send>;

/// Work queued by handlers and completed when the test says so.
#[derive(Clone, Default)]
pub struct Backlog {
    jobs: Arc<Mutex<Vec<Job>>>,
}

impl Backlog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, job: impl FnOnce() + Send + 'static) {
        self.jobs.lock().unwrap().push(Box::new(job));
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// Run every queued job, oldest first, including jobs queued meanwhile.
    pub fn drain(&self) {
        loop {
            let jobs = std::mem::take(&mut *self.jobs.lock().unwrap());
            if jobs.is_empty() {
                return;
            }
            for job in jobs {
                job();
            }
        }
    }
}

/// Holds the join until the backlog assigns a rank.
pub struct RankLookup {
    pub rank: &'static str,
    pub backlog: Backlog,
}

impl Handler<PlayerJoin> for RankLookup {
    fn handle(&self, event: &EventHandle<PlayerJoin>) -> Result<(), BoxError> {
        event.hold()?;
        let event = event.clone();
        let rank = self.rank;
        self.backlog.push(move || {
            *event.rank.lock().unwrap() = Some(rank.to_owned());
            event.resume().unwrap();
        });
        Ok(())
    }
}

//! Dispatch configuration.

/// What happens when an unfinished dispatch is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StuckPolicy {
    /// Panic with the stuck-pipeline diagnostic.
    ///
    /// Downgraded to [`StuckPolicy::Log`] while the thread is already
    /// unwinding.
    #[default]
    Panic,
    /// Report the diagnostic through `tracing` at error level.
    Log,
}

/// Per-dispatch settings.
///
/// # Example
/// ```ignore
/// let config = DispatchConfig::new()
///     .with_stuck_policy(StuckPolicy::Log)
///     .with_label("PlayerJoinEvent");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    stuck_policy: StuckPolicy,
    label: Option<&'static str>,
}

impl DispatchConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stuck policy.
    pub fn with_stuck_policy(mut self, policy: StuckPolicy) -> Self {
        self.stuck_policy = policy;
        self
    }

    /// Override the event name used in diagnostics.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// The stuck policy.
    pub fn stuck_policy(&self) -> StuckPolicy {
        self.stuck_policy
    }

    /// The label override, if any.
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }
}

//! Standard handler implementations.

pub mod logging;
#[cfg(feature = "tokio")]
pub mod spawn;

pub use logging::LoggingHandler;
#[cfg(feature = "tokio")]
pub use spawn::{AsyncHandler, TimeoutError};

//! Standard hook implementations.

pub mod logging;
#[cfg(feature = "tokio")]
pub mod timeout;

pub use logging::LoggingHook;
#[cfg(feature = "tokio")]
pub use timeout::TimeoutHook;

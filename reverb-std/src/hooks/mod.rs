//! Standard hooks.

mod logging;
#[cfg(feature = "timeout")]
mod timeout;

pub use logging::LoggingHook;
#[cfg(feature = "timeout")]
pub use timeout::{TimeoutError, TimeoutHook};

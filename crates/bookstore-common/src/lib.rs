//! Bookstore common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Ambient pieces shared by every binary in the workspace. At present this is
//! the logging setup; see [`logging`].

pub mod logging;

pub use logging::{init_logging, LogConfig, LogGuard};

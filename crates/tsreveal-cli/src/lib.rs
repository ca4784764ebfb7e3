//! Command-line host for tsreveal.
//!
//! - `args` / `config` - command-line flags and the `tsreveal.json` file
//! - `driver` - one-shot resolution of a file
//! - `watch` - file watching through the session coordinator
//! - `reporter` - diagnostic output
//! - `tracing_config` - opt-in tracing subscriber

pub mod args;
pub mod config;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
pub mod watch;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
#[cfg(test)]
#[path = "tests/watch_tests.rs"]
mod watch_tests;

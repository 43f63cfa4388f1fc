//! worklog - single-page work hours logger
//!
//! The server's whole job is delivering `index.html` and the CSS/JS it
//! references; dates, time slots and descriptions live in the browser's
//! localStorage and never reach this process.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod app;
pub mod cli;
pub mod logging;

pub use app::build_state;
pub use logging::init_logging;

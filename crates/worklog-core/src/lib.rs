//! worklog-core: HTTP serving core for the worklog page server
//!
//! The worklog application is a single-page work-hours logger: the browser
//! owns all data (localStorage), the server only delivers the page and its
//! static assets. This crate holds the transport pieces: request/response
//! types, a radix-trie router, the static file handler and the hyper-based
//! accept loop.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod handlers;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

// Re-exports
pub use error::{Error, Result};
pub use request::{Method, Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, StatusCode};
pub use router::{RouteMatch, Router};

pub use handlers::{StaticFileConfig, StaticFiles};

pub use server::{
    create_listener, serve, ConnectionTracker, DynamicHandler, ServerConfig, ServerState,
};
